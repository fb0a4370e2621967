//! glass-quote - CLI tool to calculate and quote parametric glass typologies.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use glass_quote::config::DEFAULT_BILLING_GRID_MM;
use glass_quote::{
    calculate_files, load_typology, validate_typology, CalcConfig, Calculation, ConfirmOutcome,
    ConfirmationFlow, QuoteRecord, Report, SelectOutcome, Typology,
};

/// Calculate and quote parametric glass typologies.
#[derive(Parser, Debug)]
#[command(name = "glass-quote")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate the pieces of a typology for a set of inputs
    Calc {
        #[command(flatten)]
        run: RunArgs,

        /// Output the calculation result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a typology's formulas before saving it
    Validate {
        /// Typology JSON file
        #[arg(short, long)]
        typology: PathBuf,
    },
    /// Confirm every piece and print the quote record
    Quote {
        #[command(flatten)]
        run: RunArgs,

        /// Selection for a piece slot, as PIECE:SLOT=ITEM (PIECE starts at 1)
        #[arg(short, long = "select")]
        selections: Vec<String>,

        /// Write the quote record to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Typology JSON file
    #[arg(short, long)]
    typology: PathBuf,

    /// Variable inputs JSON file
    #[arg(short, long)]
    inputs: PathBuf,

    /// Price per billed m²
    #[arg(long, conflicts_with = "material")]
    price: Option<f64>,

    /// Material id from the typology, priced at its price per m²
    #[arg(long)]
    material: Option<String>,

    /// Billing grid in mm
    #[arg(long, default_value_t = DEFAULT_BILLING_GRID_MM)]
    grid: f64,
}

impl RunArgs {
    fn run(&self) -> Result<Calculation> {
        info!("Processing: {}", self.typology.display());
        let config = CalcConfig::with_grid(self.grid);
        calculate_files(&self.typology, &self.inputs, &config)
            .with_context(|| format!("Failed to calculate {}", self.typology.display()))
    }

    fn price_per_m2(&self, typology: &Typology) -> Result<Option<f64>> {
        match &self.material {
            Some(id) => {
                let material = typology.material(id)?;
                info!("Material: {} ({}/m²)", material.name, material.price_per_m2);
                Ok(Some(material.price_per_m2))
            }
            None => Ok(self.price),
        }
    }
}

/// A `PIECE:SLOT=ITEM` selection.
#[derive(Debug, PartialEq)]
struct Selection {
    piece: usize,
    slot: usize,
    item: String,
}

fn parse_selection(raw: &str) -> Result<Selection> {
    let (target, item) = raw
        .split_once('=')
        .with_context(|| format!("Selection '{}' is missing '=ITEM'", raw))?;
    let (piece, slot) = target
        .split_once(':')
        .with_context(|| format!("Selection '{}' is missing 'PIECE:SLOT'", raw))?;
    let piece: usize = piece
        .trim()
        .parse()
        .with_context(|| format!("Invalid piece number in '{}'", raw))?;
    if piece == 0 {
        bail!("Piece numbers start at 1 in '{}'", raw);
    }
    let slot = slot
        .trim()
        .parse()
        .with_context(|| format!("Invalid slot number in '{}'", raw))?;
    Ok(Selection {
        piece: piece - 1,
        slot,
        item: item.trim().to_string(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Calc { run, json } => cmd_calc(&run, json),
        Command::Validate { typology } => cmd_validate(&typology),
        Command::Quote {
            run,
            selections,
            output,
        } => cmd_quote(&run, &selections, output),
    }
}

fn cmd_calc(run: &RunArgs, json: bool) -> Result<()> {
    let calc = run.run()?;
    let price_per_m2 = run.price_per_m2(&calc.typology)?;

    for err in &calc.result.errors {
        warn!("{}", err);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&calc.result)?);
    } else {
        let mut report = Report::new(&calc.typology, &calc.inputs, &calc.result);
        if let Some(price) = price_per_m2 {
            report = report.with_price(price);
        }
        println!("{}", report);
    }

    if calc.result.has_fatal_error() {
        bail!("Calculation failed");
    }

    Ok(())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let typology =
        load_typology(path).with_context(|| format!("Failed to load {}", path.display()))?;

    let validation = validate_typology(&typology, &CalcConfig::default());

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        bail!("Validation failed");
    }

    info!(
        "Validation passed ({} warning(s))",
        validation.warnings.len()
    );
    Ok(())
}

fn cmd_quote(run: &RunArgs, raw_selections: &[String], output: Option<PathBuf>) -> Result<()> {
    let selections = raw_selections
        .iter()
        .map(|raw| parse_selection(raw))
        .collect::<Result<Vec<_>>>()?;

    let calc = run.run()?;
    let Some(price_per_m2) = run.price_per_m2(&calc.typology)? else {
        bail!("A quote needs --price or --material");
    };

    if !calc.result.is_ok() {
        for err in &calc.result.errors {
            error!("{}", err);
        }
        bail!("Calculation has errors; fix the inputs or the typology first");
    }

    let mut flow = ConfirmationFlow::new(&calc.typology, calc.result.clone());
    while let Some(piece) = flow.current() {
        let index = flow.cursor();
        let name = piece.name.clone();

        for selection in selections.iter().filter(|s| s.piece == index) {
            match flow.select(selection.slot, &selection.item) {
                SelectOutcome::Accepted => {}
                rejected => bail!(
                    "Piece {} '{}': selection '{}' for slot {} rejected ({:?})",
                    index + 1,
                    name,
                    selection.item,
                    selection.slot,
                    rejected
                ),
            }
        }

        match flow.confirm() {
            ConfirmOutcome::Advanced { .. } | ConfirmOutcome::AllConfirmed => {
                info!("Confirmed piece {} '{}'", index + 1, name);
            }
            ConfirmOutcome::MissingSelections { slots } => bail!(
                "Piece {} '{}' needs a selection for slot(s) {:?}",
                index + 1,
                name,
                slots
            ),
            ConfirmOutcome::Finished => break,
        }
    }

    let record = QuoteRecord::build(&calc.typology, &calc.inputs, &flow, price_per_m2)?;
    let json = serde_json::to_string_pretty(&record)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generated: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
