// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use goods_catalog::{
    init_tracing, load_settings, Catalog, Dataset, Good, LogTarget, ResetScope, SelectionState,
    Settings, SortColumn, NO_RESULTS_MESSAGE,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "goods-catalog", version, about = "Filter and sort the product catalog")]
struct Cli {
    /// Directory with users / categories / products (.json or .csv)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// What "reset all filters" clears: filters | all
    #[arg(long, global = true)]
    reset_scope: Option<ResetScope>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Ui,
    /// Print the derived view once
    List(ListArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Owner, by id or name
    #[arg(long)]
    user: Option<String>,

    /// Case-insensitive product name search
    #[arg(long)]
    query: Option<String>,

    /// Category by id or title; repeat for several
    #[arg(long = "category")]
    categories: Vec<String>,

    /// id | product | category | user
    #[arg(long)]
    sort: Option<SortColumn>,

    /// Reverse the sorted order
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&log_target(cli.command.as_ref()))?;

    let settings = resolve_settings(&cli)?;

    let catalog = Catalog::load(settings.data_dir.as_deref())
        .context("failed to load catalog dataset")?;
    info!(goods = catalog.goods.len(), "catalog ready");

    match cli.command {
        Some(Command::List(args)) => run_list(&catalog, &args),
        Some(Command::Ui) | None => run_ui_mode(catalog, settings.reset_scope),
    }
}

/// The terminal UI owns the screen, so its logs go to a file
fn log_target(command: Option<&Command>) -> LogTarget {
    match command {
        Some(Command::List(_)) => LogTarget::Stderr,
        Some(Command::Ui) | None => LogTarget::session_file(),
    }
}

/// catalog.toml / environment, then CLI flags on top
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings()?;

    if let Some(dir) = &cli.data_dir {
        settings.data_dir = Some(dir.clone());
    }
    if let Some(scope) = cli.reset_scope {
        settings.reset_scope = scope;
    }

    Ok(settings)
}

fn list_selection(dataset: &Dataset, args: &ListArgs) -> Result<SelectionState> {
    let mut state = SelectionState::new();

    if let Some(user) = &args.user {
        let person = match user.parse::<i64>() {
            Ok(id) => dataset.find_person(id),
            Err(_) => dataset.find_person_by_name(user),
        }
        .ok_or_else(|| anyhow!("no user matching {:?}", user))?;
        state = state.select_user(Some(person.id));
    }

    if let Some(query) = &args.query {
        state = state.set_query(query);
    }

    for category in &args.categories {
        let found = match category.parse::<i64>() {
            Ok(id) => dataset.find_category(id),
            Err(_) => dataset.find_category_by_title(category),
        }
        .ok_or_else(|| anyhow!("no category matching {:?}", category))?;

        if !state.is_category_selected(found.id) {
            state = state.toggle_category(found.id);
        }
    }

    if let Some(column) = args.sort {
        state = state.click_column(column);
        if args.desc {
            state = state.click_column(column);
        }
    }

    Ok(state)
}

fn run_list(catalog: &Catalog, args: &ListArgs) -> Result<()> {
    let state = list_selection(&catalog.dataset, args)?;
    let view = catalog.view(&state);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("{}", NO_RESULTS_MESSAGE);
        return Ok(());
    }

    print!("{}", format_table(&state, &view, catalog.goods.len()));
    Ok(())
}

fn format_table(state: &SelectionState, view: &[Good], total: usize) -> String {
    let header: Vec<String> = SortColumn::ALL
        .iter()
        .map(|c| format!("{} {}", c.title(), state.sort_indicator(*c).glyph()))
        .collect();

    let mut out = format!(
        "{:<8} {:<30} {:<24} {}\n",
        header[0], header[1], header[2], header[3]
    );
    out.push_str(&"━".repeat(72));
    out.push('\n');

    for good in view {
        out.push_str(&format!(
            "{:<8} {:<30} {:<24} {}\n",
            good.id,
            good.name,
            good.category.label(),
            good.person.name
        ));
    }

    out.push_str(&format!("\nShowing {} of {} products\n", view.len(), total));
    out
}

#[cfg(feature = "tui")]
fn run_ui_mode(catalog: Catalog, reset_scope: ResetScope) -> Result<()> {
    println!("🛒 Loading Goods Catalog UI...\n");
    println!("✓ Loaded {} products", catalog.goods.len());
    if let LogTarget::File(path) = LogTarget::session_file() {
        println!("  Logs: {}", path.display());
    }
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(catalog, reset_scope);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_catalog: Catalog, _reset_scope: ResetScope) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print once: goods-catalog list --help");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_args(argv: &[&str]) -> ListArgs {
        let mut full = vec!["goods-catalog", "list"];
        full.extend_from_slice(argv);

        match Cli::parse_from(full).command {
            Some(Command::List(args)) => args,
            other => panic!("expected list command, got {:?}", other),
        }
    }

    #[test]
    fn test_list_selection_by_names() {
        let dataset = Dataset::builtin().unwrap();
        let args = list_args(&["--user", "anna", "--category", "Fruits", "--sort", "product", "--desc"]);

        let state = list_selection(&dataset, &args).unwrap();

        assert_eq!(state.selected_user, Some(2));
        assert!(state.is_category_selected(3));
        assert_eq!(state.sort_column, Some(SortColumn::Product));
        assert_eq!(state.sort_direction, goods_catalog::SortDirection::Descending);
    }

    #[test]
    fn test_list_selection_repeated_category_stays_selected() {
        let dataset = Dataset::builtin().unwrap();
        let args = list_args(&["--category", "1", "--category", "grocery"]);

        let state = list_selection(&dataset, &args).unwrap();
        assert!(state.is_category_selected(1));
    }

    #[test]
    fn test_list_selection_unknown_user() {
        let dataset = Dataset::builtin().unwrap();
        let args = list_args(&["--user", "Nobody"]);

        assert!(list_selection(&dataset, &args).is_err());
    }

    #[test]
    fn test_unknown_sort_column_rejected_by_parser() {
        let result = Cli::try_parse_from(["goods-catalog", "list", "--sort", "price"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_ui_never_logs_to_stderr() {
        for argv in [vec!["goods-catalog"], vec!["goods-catalog", "ui"]] {
            let cli = Cli::parse_from(argv);
            assert_ne!(log_target(cli.command.as_ref()), LogTarget::Stderr);
        }

        let cli = Cli::parse_from(["goods-catalog", "list"]);
        assert_eq!(log_target(cli.command.as_ref()), LogTarget::Stderr);
    }

    #[test]
    fn test_format_table() {
        let catalog = Catalog::load(None).unwrap();
        let state = SelectionState::new().set_query("bread").click_column(SortColumn::Id);
        let view = catalog.view(&state);

        let table = format_table(&state, &view, catalog.goods.len());

        assert!(table.contains("ID ▲"));
        assert!(table.contains("🍞 - Grocery"));
        assert!(table.contains("Anna"));
        assert!(table.contains("Showing 1 of 9 products"));
    }
}
