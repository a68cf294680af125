//! End-to-end command runs against a temporary board directory

use serde_json::Value;
use tempfile::TempDir;
use workshop_cli::cli::{Commands, OutputFormat};
use workshop_cli::commands::{run, CommandContext};
use workshop_cli::exit_codes::EXIT_SUCCESS;
use workshop_kanban::BoardConfig;

struct Board {
    _temp: TempDir,
    ctx: CommandContext,
}

impl Board {
    async fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let ctx = CommandContext {
            config: BoardConfig {
                data_dir: temp.path().join("shop"),
                ..Default::default()
            },
            format: OutputFormat::Json,
            quiet: true,
        };
        let board = Self { _temp: temp, ctx };
        board.exec(Commands::Init { force: false }).await;
        board
    }

    async fn exec(&self, command: Commands) -> String {
        let mut out = Vec::new();
        let code = run(command, &self.ctx, &mut out).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
        String::from_utf8(out).unwrap()
    }

    /// Quiet `add` prints only the new id
    async fn add(&self, title: &str, column: &str) -> String {
        self.exec(Commands::Add {
            title: title.to_string(),
            column: column.to_string(),
            description: None,
        })
        .await
        .trim()
        .to_string()
    }

    async fn titles(&self) -> Vec<(String, Vec<String>)> {
        let listing: Value = serde_json::from_str(&self.exec(Commands::List).await).unwrap();
        listing["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|column| {
                let titles = column["items"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|item| item["title"].as_str().unwrap().to_string())
                    .collect();
                (column["id"].as_str().unwrap().to_string(), titles)
            })
            .collect()
    }
}

fn column(id: &str, titles: &[&str]) -> (String, Vec<String>) {
    (
        id.to_string(),
        titles.iter().map(|t| t.to_string()).collect(),
    )
}

#[tokio::test]
async fn test_move_within_and_across_columns() {
    let board = Board::new().await;
    let sled = board.add("Table saw sled", "todo").await;
    let router = board.add("Router table", "todo").await;
    board.add("Shop vac cart", "doing").await;

    // Router table above the sled
    board
        .exec(Commands::Move {
            item: router.clone(),
            onto: sled.clone(),
            column: false,
            after: false,
        })
        .await;
    let listing = board.titles().await;
    assert_eq!(listing[0], column("todo", &["Router table", "Table saw sled"]));

    // Sled to the end of "done"
    board
        .exec(Commands::Move {
            item: sled,
            onto: "done".to_string(),
            column: true,
            after: false,
        })
        .await;

    assert_eq!(
        board.titles().await,
        vec![
            column("todo", &["Router table"]),
            column("doing", &["Shop vac cart"]),
            column("done", &["Table saw sled"]),
        ]
    );
}

#[tokio::test]
async fn test_move_after_lands_below_target() {
    let board = Board::new().await;
    let clamps = board.add("Clamp rack", "todo").await;
    board.add("Bench vise", "todo").await;
    let bench = board.add("Workbench", "doing").await;

    board
        .exec(Commands::Move {
            item: clamps,
            onto: bench,
            column: false,
            after: true,
        })
        .await;

    let listing = board.titles().await;
    assert_eq!(listing[0], column("todo", &["Bench vise"]));
    assert_eq!(listing[1], column("doing", &["Workbench", "Clamp rack"]));
}

#[tokio::test]
async fn test_move_column_is_persisted() {
    let board = Board::new().await;
    board
        .exec(Commands::MoveColumn {
            column: "done".to_string(),
            onto: "todo".to_string(),
        })
        .await;

    let ids: Vec<String> = board.titles().await.into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["done", "todo", "doing"]);
}

#[tokio::test]
async fn test_list_as_yaml() {
    let mut board = Board::new().await;
    board.add("Lumber cart", "todo").await;
    board.ctx.format = OutputFormat::Yaml;

    let yaml = board.exec(Commands::List).await;
    assert!(yaml.contains("columns:"));
    assert!(yaml.contains("title: Lumber cart"));
}
