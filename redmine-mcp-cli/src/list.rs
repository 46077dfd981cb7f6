//! The `tools` command: print the tool catalogue

use anyhow::Result;
use colored::*;
use redmine_mcp::ToolRegistry;
use serde_json::Value;
use tabled::{
    settings::{object::Rows, Alignment, Color, Modify, Style},
    Table, Tabled,
};

use crate::cli::{Cli, OutputFormat};

const DESCRIPTION_WIDTH: usize = 60;

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Required")]
    required: String,
}

#[derive(serde::Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    required: Vec<String>,
    input_schema: Value,
}

fn collect(registry: &ToolRegistry) -> Vec<ToolInfo> {
    registry
        .list_tools()
        .into_iter()
        .map(|tool| {
            let input_schema = Value::Object((*tool.input_schema).clone());
            let required = input_schema
                .get("required")
                .and_then(Value::as_array)
                .map(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            ToolInfo {
                name: tool.name.to_string(),
                description: tool.description.map(|d| d.to_string()).unwrap_or_default(),
                required,
                input_schema,
            }
        })
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Render the catalogue in the requested format
pub fn render_tools(format: OutputFormat, verbose: bool) -> Result<String> {
    let registry = ToolRegistry::with_redmine_tools()?;
    let tools = collect(&registry);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&tools)?),
        OutputFormat::Table => Ok(render_table(&tools, verbose, false)),
    }
}

fn render_table(tools: &[ToolInfo], verbose: bool, colorize: bool) -> String {
    let rows: Vec<ToolRow> = tools
        .iter()
        .map(|info| ToolRow {
            name: info.name.clone(),
            description: if verbose {
                info.description.clone()
            } else {
                truncate(&info.description, DESCRIPTION_WIDTH)
            },
            required: info.required.join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    if colorize {
        table.with(Modify::new(Rows::one(0)).with(Color::FG_BRIGHT_CYAN));
    }
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    table.to_string()
}

/// Print the catalogue to stdout
pub fn run_list_command(format: OutputFormat, verbose: bool) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_tools(format, verbose)?),
        OutputFormat::Table => {
            let registry = ToolRegistry::with_redmine_tools()?;
            let tools = collect(&registry);
            let is_tty = Cli::is_tty();

            println!("{}", render_table(&tools, verbose, Cli::should_use_color()));
            if is_tty {
                println!();
                println!("{} tools", tools.len().to_string().bright_white());
                if !verbose {
                    println!("  Use {} to see full descriptions", "--verbose".cyan());
                }
            }
        }
    }
    Ok(())
}
