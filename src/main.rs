mod currency;
mod engine;
mod model;
mod session;

use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, Color, Table};
use directories::ProjectDirs;
use inquire::{Confirm, Select, Text};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::currency::{CurrencyStyle, format_currency};
use crate::engine::{compute_summary, price_after_discount};
use crate::model::{CalcSummary, InvoiceLine, LineBreakdown};
use crate::session::{LineEdit, Session, parse_amount};

// ==========================================
// Constants
// ==========================================
const EDIT_OPT: &str = "✏️  Edit Line";
const ADD_OPT: &str = "➕ Add Line";
const REMOVE_OPT: &str = "🗑  Remove Line";
const TARGET_OPT: &str = "🎯 Set Final Amount";
const EXPORT_OPT: &str = "📋 Export Summary (JSON)";
const QUIT_OPT: &str = "🚪 Quit";

// ==========================================
// Structs & Enums
// ==========================================

#[derive(Debug, Serialize, Deserialize)]
struct AppSettings {
    currency_symbol: String,
    european_format: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            currency_symbol: "€".to_string(),
            european_format: true,
        }
    }
}

impl AppSettings {
    fn style(&self) -> CurrencyStyle {
        if self.european_format {
            CurrencyStyle::European
        } else {
            CurrencyStyle::Anglo
        }
    }

    fn fmt(&self, value: f64) -> String {
        format_currency(value, &self.currency_symbol, self.style())
    }
}

#[derive(Parser)]
#[command(name = "discount-calc")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive calculation session
    New,
    /// One-shot calculation from line specs, e.g. --line "Consulting:2:300"
    Quick {
        /// Line spec "name:qty:price", append ":fixed" to exclude from discount
        #[arg(long = "line")]
        lines: Vec<String>,
        /// Target final invoice amount (blank or invalid counts as 0)
        #[arg(long = "final", default_value = "")]
        final_amount: String,
        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Configure currency display
    Config,
}

// ==========================================
// Main Function
// ==========================================

fn main() {
    let cli = Cli::parse();
    let settings = load_settings().unwrap_or_default();

    if cli.command.is_none() {
        use clap::CommandFactory;
        Cli::command().print_help().unwrap();
        return;
    }

    match cli.command.unwrap() {
        Commands::New => {
            run_session(&settings);
        }
        Commands::Quick {
            lines,
            final_amount,
            json,
        } => {
            run_quick(&settings, &lines, &final_amount, json);
        }
        Commands::Config => {
            setup_config_wizard();
        }
    }
}

// ==========================================
// 1. Interactive Session
// ==========================================

fn run_session(settings: &AppSettings) {
    println!("\n--- Invoice Discount Calculator ---");
    println!("💡 Tip: un-flag lines that must be paid in full, then set the target final amount.");

    let mut session = Session::new();

    loop {
        // Full stateless re-derivation after every accepted mutation.
        let summary = compute_summary(&session.lines, session.final_amount);
        render_lines(&session, &summary, settings);
        render_summary(&session, &summary, settings);

        let actions = vec![EDIT_OPT, ADD_OPT, REMOVE_OPT, TARGET_OPT, EXPORT_OPT, QUIT_OPT];
        let choice = match Select::new("Action:", actions).prompt() {
            Ok(c) => c,
            Err(_) => break,
        };

        session = match choice {
            EDIT_OPT => edit_line_wizard(&session),
            ADD_OPT => session.add_line(),
            REMOVE_OPT => remove_line_wizard(&session),
            TARGET_OPT => set_target_wizard(&session),
            EXPORT_OPT => {
                print_json(&session, &summary);
                session
            }
            _ => break,
        };
    }
    println!("👋 Done.");
}

fn edit_line_wizard(session: &Session) -> Session {
    let Some(line) = choose_line(session, "Select Line to Edit:") else {
        return session.clone();
    };

    let fields = vec!["Name", "Quantity", "Unit Price", "Apply Discount"];
    let field = match Select::new("Field:", fields).prompt() {
        Ok(f) => f,
        Err(_) => return session.clone(),
    };

    let edit = match field {
        "Name" => {
            let input = Text::new("Item Name:")
                .with_initial_value(&line.name)
                .prompt();
            match input {
                Ok(name) => LineEdit::Name(name),
                Err(_) => return session.clone(),
            }
        }
        "Quantity" => {
            let input = Text::new("Quantity:")
                .with_initial_value(&format!("{}", line.quantity))
                .prompt();
            match input {
                // Prompt boundary clamps to >= 0; the engine itself
                // tolerates anything numeric.
                Ok(raw) => LineEdit::Quantity(parse_amount(&raw).max(0.0)),
                Err(_) => return session.clone(),
            }
        }
        "Unit Price" => {
            let input = Text::new("Unit Price:")
                .with_initial_value(&format!("{}", line.unit_price))
                .prompt();
            match input {
                Ok(raw) => LineEdit::UnitPrice(parse_amount(&raw).max(0.0)),
                Err(_) => return session.clone(),
            }
        }
        _ => {
            let flag = Confirm::new("Apply discount to this line?")
                .with_default(line.apply_discount)
                .prompt();
            match flag {
                Ok(f) => LineEdit::ApplyDiscount(f),
                Err(_) => return session.clone(),
            }
        }
    };

    session.update_line(line.id, edit)
}

fn remove_line_wizard(session: &Session) -> Session {
    if session.lines.len() <= 1 {
        println!("❌ At least one line must remain.");
        return session.clone();
    }
    match choose_line(session, "Select Line to Remove:") {
        Some(line) => session.remove_line(line.id),
        None => session.clone(),
    }
}

fn set_target_wizard(session: &Session) -> Session {
    let current = if session.final_amount == 0.0 {
        String::new()
    } else {
        format!("{}", session.final_amount)
    };
    let input = Text::new("Final Invoice Amount:")
        .with_initial_value(&current)
        .with_placeholder("0.00")
        .prompt();
    match input {
        Ok(raw) => session.set_final_amount(parse_amount(&raw)),
        Err(_) => session.clone(),
    }
}

fn choose_line(session: &Session, prompt: &str) -> Option<InvoiceLine> {
    let options: Vec<String> = session
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let label = if line.name.trim().is_empty() {
                "(unnamed)"
            } else {
                line.name.as_str()
            };
            format!("{}. {} | {} x {}", i + 1, label, line.quantity, line.unit_price)
        })
        .collect();

    let ans = Select::new(prompt, options).prompt().ok()?;
    // Selection carries its 1-based index up front.
    let idx: usize = ans.split('.').next()?.parse().ok()?;
    session.lines.get(idx.checked_sub(1)?).cloned()
}

// ==========================================
// 2. Quick (one-shot) Mode
// ==========================================

fn run_quick(settings: &AppSettings, specs: &[String], final_input: &str, json: bool) {
    let mut lines: Vec<InvoiceLine> = specs.iter().map(|s| parse_line_spec(s)).collect();
    if lines.is_empty() {
        // The collection is never empty; fall back to one blank line.
        lines.push(InvoiceLine::new());
    }

    let session = Session {
        lines,
        final_amount: parse_amount(final_input),
    };
    let summary = compute_summary(&session.lines, session.final_amount);

    if json {
        print_json(&session, &summary);
    } else {
        render_lines(&session, &summary, settings);
        render_summary(&session, &summary, settings);
    }
}

/// "name:qty:price[:fixed]" — missing parts fall back to the default line
/// (qty 1, price 0, discountable). "fixed" / "nodiscount" opts the line out.
fn parse_line_spec(spec: &str) -> InvoiceLine {
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or("").trim().to_string();
    let quantity = match parts.next() {
        Some(q) => parse_amount(q).max(0.0),
        None => 1.0,
    };
    let unit_price = match parts.next() {
        Some(p) => parse_amount(p).max(0.0),
        None => 0.0,
    };
    let flag_token = parts.next().map(|t| t.trim().to_ascii_lowercase());
    let apply_discount = !matches!(flag_token.as_deref(), Some("fixed" | "nodiscount"));

    InvoiceLine {
        name,
        quantity,
        unit_price,
        apply_discount,
        ..InvoiceLine::new()
    }
}

// ==========================================
// 3. Rendering
// ==========================================

fn render_lines(session: &Session, summary: &CalcSummary, settings: &AppSettings) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Item Name"),
        Cell::new("Qty"),
        Cell::new("Price"),
        Cell::new("Line Total"),
        Cell::new("Discounted"),
        Cell::new("Discount?"),
    ]);

    for (i, line) in session.lines.iter().enumerate() {
        let discounted = price_after_discount(line, summary.discount_percentage);
        let discounted_cell = if line.apply_discount && summary.discount_percentage > 0.0 {
            Cell::new(settings.fmt(discounted)).fg(Color::Rgb { r: 4, g: 120, b: 87 })
        } else {
            Cell::new(settings.fmt(discounted))
        };
        let name = if line.name.trim().is_empty() {
            "(unnamed)".to_string()
        } else {
            line.name.clone()
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(name),
            Cell::new(line.quantity),
            Cell::new(settings.fmt(line.unit_price)),
            Cell::new(settings.fmt(line.line_total())),
            discounted_cell,
            Cell::new(if line.apply_discount { "Yes" } else { "No" }),
        ]);
    }

    println!("\n{table}");
}

fn render_summary(session: &Session, summary: &CalcSummary, settings: &AppSettings) {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Calculation Summary"), Cell::new("")]);

    table.add_row(vec![
        Cell::new("Total Pre-Discount"),
        Cell::new(settings.fmt(summary.total_pre_discount)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Sum of Discountable Lines"),
        Cell::new(settings.fmt(summary.discountable_total)),
    ]);
    table.add_row(vec![
        Cell::new("Sum of Non-Discountable Lines"),
        Cell::new(settings.fmt(summary.non_discountable_total)),
    ]);

    let discount_cell = Cell::new(settings.fmt(summary.total_discount_amount));
    let discount_cell = if summary.total_discount_amount > 0.0 {
        discount_cell.fg(Color::Rgb { r: 185, g: 28, b: 28 })
    } else {
        discount_cell
    };
    table.add_row(vec![Cell::new("Total Discount Amount"), discount_cell]);

    table.add_row(vec![
        Cell::new("Final Invoice Amount (target)"),
        Cell::new(settings.fmt(session.final_amount)),
    ]);

    let rate_cell = Cell::new(format!("{:.5} %", summary.discount_percentage))
        .add_attribute(Attribute::Bold);
    let rate_cell = if summary.discount_percentage > 0.0 {
        rate_cell.fg(Color::Rgb { r: 4, g: 120, b: 87 })
    } else {
        rate_cell
    };
    table.add_row(vec![Cell::new("Calculated Discount Rate"), rate_cell]);

    table.add_row(vec![
        Cell::new("Calculated Total After Discount"),
        Cell::new(settings.fmt(summary.calculated_final_amount)).add_attribute(Attribute::Bold),
    ]);

    println!("{table}");
}

fn print_json(session: &Session, summary: &CalcSummary) {
    #[derive(Serialize)]
    struct ExportPayload<'a> {
        lines: Vec<LineBreakdown>,
        summary: &'a CalcSummary,
    }

    let payload = ExportPayload {
        lines: line_breakdowns(&session.lines, summary),
        summary,
    };

    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("❌ JSON export failed: {}", e),
    }
}

fn line_breakdowns(lines: &[InvoiceLine], summary: &CalcSummary) -> Vec<LineBreakdown> {
    lines
        .iter()
        .map(|line| LineBreakdown {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            apply_discount: line.apply_discount,
            line_total: line.line_total(),
            discounted_total: price_after_discount(line, summary.discount_percentage),
        })
        .collect()
}

// ==========================================
// 4. Config & Utilities
// ==========================================

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "discount-calc", "app") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).ok();
        }
        return config_dir.join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

fn load_settings() -> Option<AppSettings> {
    let path = get_config_path();
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

fn setup_config_wizard() -> AppSettings {
    println!("\n⚙️  --- Display Configuration ---");
    let current = load_settings().unwrap_or_default();

    let symbol = match Text::new("Currency Symbol:")
        .with_default(&current.currency_symbol)
        .prompt()
    {
        Ok(s) => s,
        Err(_) => current.currency_symbol.clone(),
    };

    let styles = vec!["1.234,56 € (European)", "$1,234.56 (Anglo)"];
    let starting = if current.european_format { 0 } else { 1 };
    let european = match Select::new("Number Style:", styles)
        .with_starting_cursor(starting)
        .prompt()
    {
        Ok(choice) => choice.ends_with("(European)"),
        Err(_) => current.european_format,
    };

    let settings = AppSettings {
        currency_symbol: symbol,
        european_format: european,
    };

    let path = get_config_path();
    let toml_str = toml::to_string_pretty(&settings).unwrap();
    fs::write(&path, toml_str).expect("Failed to save settings");
    println!("✅ Settings saved.");
    settings
}

// ==========================================
// Tests
// ==========================================
