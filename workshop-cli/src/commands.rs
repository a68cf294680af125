//! Command implementations
//!
//! Every mutating command opens a [`BoardSession`] over the board directory,
//! performs its gesture through the drag hooks, and closes the session so the
//! persistence queue is drained before the process exits.

use crate::cli::{Commands, OutputFormat};
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use workshop_kanban::{
    BoardConfig, BoardSession, Column, ColumnId, EntityKind, Item, ItemId, JsonFileGateway,
    KanbanError, PersistInstruction, Target,
};

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: BoardConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    fn gateway(&self) -> Arc<JsonFileGateway> {
        Arc::new(JsonFileGateway::new(&self.config.data_dir))
    }

    async fn open(&self) -> Result<BoardSession> {
        let gateway = self.gateway();
        if !gateway.is_initialized() {
            return Err(KanbanError::NotInitialized {
                path: self.config.data_dir.clone(),
            }
            .into());
        }
        BoardSession::load(gateway, &self.config)
            .await
            .with_context(|| format!("failed to open board at {}", self.config.data_dir.display()))
    }
}

#[derive(Debug, Serialize)]
struct ColumnView {
    id: ColumnId,
    title: String,
    items: Vec<Item>,
}

#[derive(Debug, Serialize)]
struct BoardView {
    columns: Vec<ColumnView>,
}

/// Run one command, writing its output to `out`. Returns the exit code.
pub async fn run(command: Commands, ctx: &CommandContext, out: &mut dyn Write) -> Result<i32> {
    match command {
        Commands::Init { force } => init(ctx, force, out).await,
        Commands::Add {
            title,
            column,
            description,
        } => add(ctx, title, column, description, out).await,
        Commands::List => list(ctx, out).await,
        Commands::Move {
            item,
            onto,
            column,
            after,
        } => move_item(ctx, &item, &onto, column, after, out).await,
        Commands::MoveColumn { column, onto } => move_column(ctx, &column, &onto, out).await,
    }
}

async fn init(ctx: &CommandContext, force: bool, out: &mut dyn Write) -> Result<i32> {
    ctx.gateway().init(&Column::defaults(), force).await?;
    if !ctx.quiet {
        writeln!(out, "Initialized board at {}", ctx.config.data_dir.display())?;
    }
    Ok(EXIT_SUCCESS)
}

async fn add(
    ctx: &CommandContext,
    title: String,
    column: String,
    description: Option<String>,
    out: &mut dyn Write,
) -> Result<i32> {
    let gateway = ctx.gateway();
    if !gateway.is_initialized() {
        return Err(KanbanError::NotInitialized {
            path: ctx.config.data_dir.clone(),
        }
        .into());
    }
    let mut item = Item::new(title, column.as_str());
    if let Some(description) = description {
        item = item.with_description(description);
    }
    let item = gateway.add_item(item).await?;
    if ctx.quiet {
        writeln!(out, "{}", item.id)?;
    } else {
        writeln!(
            out,
            "Added {} to {} at position {}",
            item.id, item.column_id, item.position
        )?;
    }
    Ok(EXIT_SUCCESS)
}

async fn list(ctx: &CommandContext, out: &mut dyn Write) -> Result<i32> {
    let session = ctx.open().await?;
    let view = BoardView {
        columns: session
            .columns()
            .into_iter()
            .map(|column| ColumnView {
                items: session.container_items(&column.id),
                id: column.id,
                title: column.title,
            })
            .collect(),
    };
    session.close().await;

    match ctx.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml_ng::to_string(&view)?)?,
    }
    Ok(EXIT_SUCCESS)
}

async fn move_item(
    ctx: &CommandContext,
    item: &str,
    onto: &str,
    to_column: bool,
    after: bool,
    out: &mut dyn Write,
) -> Result<i32> {
    let mut session = ctx.open().await?;
    let id = ItemId::from(item);
    if !session.item_store().contains(&id) {
        return Err(KanbanError::ItemNotFound { id: item.to_string() }.into());
    }

    let target = if to_column {
        if !session.column_registry().contains(&ColumnId::from(onto)) {
            return Err(KanbanError::ColumnNotFound { id: onto.to_string() }.into());
        }
        Target::column(onto)
    } else {
        if !session.item_store().contains(&ItemId::from(onto)) {
            return Err(KanbanError::ItemNotFound { id: onto.to_string() }.into());
        }
        let target = Target::item(onto);
        if after {
            target.after()
        } else {
            target
        }
    };

    session.begin_drag(item, EntityKind::Item);
    session.update_hover(target.clone());
    let instructions = session.commit_drag(Some(target));

    let summary = session
        .item_store()
        .get(&id)
        .map(|placed| format!("Placed {} in {} at position {}", id, placed.column_id, placed.position));
    finish(ctx, session, &instructions, summary, out).await
}

async fn move_column(
    ctx: &CommandContext,
    column: &str,
    onto: &str,
    out: &mut dyn Write,
) -> Result<i32> {
    let mut session = ctx.open().await?;
    for id in [column, onto] {
        if !session.column_registry().contains(&ColumnId::from(id)) {
            return Err(KanbanError::ColumnNotFound { id: id.to_string() }.into());
        }
    }

    session.begin_drag(column, EntityKind::Column);
    session.update_hover(Target::column(onto));
    let instructions = session.commit_drag(Some(Target::column(onto)));

    let order: Vec<String> = session
        .columns()
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    let summary = Some(format!("Column order: {}", order.join(", ")));
    finish(ctx, session, &instructions, summary, out).await
}

/// Drain the queue and report what happened
async fn finish(
    ctx: &CommandContext,
    session: BoardSession,
    instructions: &[PersistInstruction],
    summary: Option<String>,
    out: &mut dyn Write,
) -> Result<i32> {
    let stats = session.close().await;

    if stats.failed > 0 {
        tracing::warn!(failed = stats.failed, "some writes were not persisted");
        eprintln!(
            "Warning: {} of {} writes failed; run `workshop list` to see the stored board",
            stats.failed,
            stats.failed + stats.applied
        );
        return Ok(EXIT_WARNING);
    }

    if !ctx.quiet {
        if instructions.is_empty() {
            writeln!(out, "Nothing to move")?;
        } else if let Some(summary) = summary {
            writeln!(out, "{summary}")?;
        }
    }
    Ok(EXIT_SUCCESS)
}
