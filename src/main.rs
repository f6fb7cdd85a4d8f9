use aefi_search::config::SearchConfig;
use aefi_search::search_event::SearchEvent;
use aefi_search::session::SearchSession;
use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "search_config.json";

const HELP: &str = r#"命令:
  {...}          JSON 格式的搜索事件，例如
                 {"ownerEntityName":"caefiss_aefi_vaccines","fieldName":"caefiss_lot_number","dataKind":"text","operator":"equal","rawValue":"AB123","mutationKind":"update"}
  fetch [id]     编译查询文档，带 id 时包含行标识
  columns [id]   展开输出列
  view <name>    生成保存视图的载荷 (JSON)
  tree           显示各实体当前的输出字段和条件
  reset          清空搜索状态
  help           显示帮助
  quit           退出"#;

/// 加载配置，失败时使用默认配置
fn load_config(path: &str) -> (SearchConfig, Option<String>) {
    match SearchConfig::from_json_file(path) {
        Ok(config) => (config, None),
        Err(e) => (SearchConfig::default(), Some(e.to_string())),
    }
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let (config, load_error) = load_config(&config_path);

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match load_error {
        None => tracing::info!(path = %config_path, "configuration loaded"),
        Some(reason) => tracing::warn!(%reason, "using default configuration"),
    }

    println!("--- AEFI Search: 搜索事件到查询文档 ---");
    println!("输入 help 查看命令");

    let mut session = SearchSession::new(config);
    let mut editor = DefaultEditor::new().context("无法初始化行编辑器")?;

    loop {
        match editor.readline(">> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                if !run_command(&mut session, line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// 执行一行输入，返回 false 表示退出
fn run_command(session: &mut SearchSession, line: &str) -> bool {
    if line.starts_with('{') {
        match serde_json::from_str::<SearchEvent>(line) {
            Ok(event) => match session.add_search_event(event) {
                Ok(()) => println!("✓ 当前共 {} 个条件", session.tree().criteria_count()),
                Err(e) => println!("✗ 事件载荷无效: {}", e),
            },
            Err(e) => println!("✗ 无法解析搜索事件: {}", e),
        }
        return true;
    }

    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match command {
        "fetch" => {
            let document = session.compile(argument == "id");
            print!("{}", document.to_pretty_string());
            if !document.pruned.is_empty() {
                println!("(省略的空分支: {})", document.pruned.join(", "));
            }
        }
        "columns" => {
            for column in session.columns(argument == "id") {
                println!("{}", column);
            }
        }
        "view" => {
            if argument.is_empty() {
                println!("✗ 需要视图名称");
                return true;
            }
            let view = session.saved_view(argument);
            match serde_json::to_string_pretty(&view) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("✗ 无法序列化视图: {}", e),
            }
        }
        "tree" => print_tree(session),
        "reset" => {
            session.reset();
            println!("✓ 已清空");
        }
        "help" => println!("{}", HELP),
        "quit" | "exit" => return false,
        other => println!("✗ 未知命令: {} (输入 help 查看命令)", other),
    }
    true
}

fn print_tree(session: &SearchSession) {
    let tree = session.tree();
    for node in tree.iter() {
        let depth = std::iter::successors(node.parent, |id| tree.get(*id).parent).count();
        println!("{}{} ({})", "  ".repeat(depth), node.name, node.alias);
        for field in &node.output_fields {
            println!("{}  + {}", "  ".repeat(depth), field);
        }
        for (field, criterion) in &node.criteria {
            println!(
                "{}  ? {} {:?} {:?}",
                "  ".repeat(depth),
                field,
                criterion.operator,
                criterion.value
            );
        }
    }
}
