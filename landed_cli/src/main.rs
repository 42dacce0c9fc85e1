//! # Landed CLI
//!
//! Terminal front end for the landed cost engine. Each subcommand reads its
//! input as JSON, prints a human-readable summary and then the full result
//! as JSON for scripts.
//!
//! ```text
//! landed cost <shipment.json>
//! landed pack <length> <width> <height> [pallet]
//! landed split <shipment.json>
//! landed scan <shipment.json>
//! landed import <import.json>
//! landed compare <a.json> <b.json>
//! landed settings [show|reset|path]
//! ```
//!
//! Run without arguments for an interactive demo. `--settings <path>`
//! selects the settings file; `RUST_LOG` controls diagnostics on stderr.

mod settings_store;

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::de::DeserializeOwned;
use serde::Serialize;

use landed_core::calculations::comparison::{compare_scenarios, ComparisonOutcome, Scenario, ScenarioCalculation};
use landed_core::calculations::cost::{compute_cost, CostBreakdown};
use landed_core::calculations::efficiency::{scan_efficiency, EfficiencyMetric, EfficiencyScan};
use landed_core::calculations::import_price::{compute_import_price, ImportPriceInput};
use landed_core::calculations::pallet::shipping_capacity;
use landed_core::calculations::split::{optimize_splits, SplitAnalysis};
use landed_core::dimensions::{BoxDimensions, PalletType};
use landed_core::errors::{CalcError, CalcResult};
use landed_core::rates::RateTable;
use landed_core::settings::Settings;
use landed_core::shipment::{Commission, QuantityMode, ShipmentInput, ShippingMode};

const USAGE: &str = "\
Usage: landed [--settings <path>] <command> [args]

Commands:
  cost <shipment.json>             Landed cost breakdown
  pack <l> <w> <h> [pallet]        Boxes per 20ft/40ft container (mm; pallet e.g. 1100x1100)
  split <shipment.json>            One shipment or several?
  scan <shipment.json>             Would a few more boxes lower the unit cost?
  import <import.json>             CNY purchase price to KRW
  compare <a.json> <b.json>        Compare two saved scenarios
  settings [show|reset|path]       Show, reset or locate the settings file

Run without a command for an interactive demo.";

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = retry_hint(&e) {
                eprintln!("{}", hint);
            }
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// Advice for errors that may succeed when simply run again.
fn retry_hint(error: &CalcError) -> Option<&'static str> {
    error
        .is_recoverable()
        .then_some("Another landed process is writing the settings; try again when it finishes.")
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(mut args: Vec<String>) -> CalcResult<()> {
    let settings_path = take_settings_flag(&mut args)?.unwrap_or_else(settings_store::default_settings_path);

    let Some(command) = args.first().cloned() else {
        let settings = settings_store::load_or_default(&settings_path)?;
        return run_demo(&settings.rates);
    };
    let rest = &args[1..];
    tracing::debug!(command = %command, settings = %settings_path.display(), "running command");

    match command.as_str() {
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
            Ok(())
        }
        "settings" => run_settings(rest, &settings_path),
        _ => {
            let settings = settings_store::load_or_default(&settings_path)?;
            let rates = settings.rates;
            match command.as_str() {
                "cost" => {
                    let input: ShipmentInput = read_json(arg(rest, 0, "shipment.json")?)?;
                    let cost = priced(compute_cost(&input, &rates), &input)?;
                    print_cost(&input, &cost);
                    print_json(&cost);
                    Ok(())
                }
                "pack" => run_pack(rest),
                "split" => {
                    let input: ShipmentInput = read_json(arg(rest, 0, "shipment.json")?)?;
                    let boxes = input.quantity.total_boxes().unwrap_or(0);
                    let analysis = priced(optimize_splits(boxes, &input, &rates), &input)?;
                    print_split(&analysis);
                    print_json(&analysis);
                    Ok(())
                }
                "scan" => {
                    let input: ShipmentInput = read_json(arg(rest, 0, "shipment.json")?)?;
                    let scan = priced(scan_efficiency(&input, &rates), &input)?;
                    print_scan(&scan);
                    print_json(&scan);
                    Ok(())
                }
                "import" => run_import(rest),
                "compare" => run_compare(rest, &rates),
                other => Err(CalcError::invalid_input("command", other, format!("Unknown command\n\n{}", USAGE))),
            }
        }
    }
}

/// Remove `--settings <path>` from the arguments.
fn take_settings_flag(args: &mut Vec<String>) -> CalcResult<Option<PathBuf>> {
    let Some(index) = args.iter().position(|a| a == "--settings") else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(CalcError::missing_field("--settings <path>"));
    }
    let path = args.remove(index + 1);
    args.remove(index);
    Ok(Some(PathBuf::from(path)))
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> CalcResult<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CalcError::missing_field(name))
}

fn parse_f64(value: &str, field: &str) -> CalcResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CalcError::invalid_input(field, value, "Expected a number"))
}

fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> CalcResult<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Turn a `None` result into the validation error that explains it.
fn priced<T>(result: Option<T>, input: &ShipmentInput) -> CalcResult<T> {
    result.ok_or_else(|| match input.validate() {
        Err(e) => e,
        Ok(()) => CalcError::calculation_failed("shipment", "Rate table is incomplete"),
    })
}

fn print_json<T: Serialize>(value: &T) {
    println!();
    println!("JSON Output:");
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_pack(args: &[String]) -> CalcResult<()> {
    let box_dims = BoxDimensions::new(
        parse_f64(arg(args, 0, "length")?, "length")?,
        parse_f64(arg(args, 1, "width")?, "width")?,
        parse_f64(arg(args, 2, "height")?, "height")?,
    );
    let pallet = match args.get(3).map(String::as_str) {
        None | Some("none") => None,
        Some(name) => Some(name.parse::<PalletType>()?),
    };

    let capacity = shipping_capacity(&box_dims, pallet.map(|p| p.spec()).as_ref())
        .ok_or_else(|| CalcError::invalid_input("box", format!("{:?}", box_dims), "All sides must be positive"))?;

    print_header("CONTAINER CAPACITY");
    println!(
        "Box: {:.0} x {:.0} x {:.0} mm   Pallet: {}",
        box_dims.length,
        box_dims.width,
        box_dims.height,
        pallet.map(|p| p.name()).unwrap_or("none")
    );
    println!();
    for entry in &capacity {
        let load = &entry.load;
        println!("  {:<5} loose: {:>6} boxes", entry.container.name(), load.loose_units);
        if let Some(p) = &load.palletized {
            println!(
                "        palletized: {} pallets x {} boxes = {} boxes (stack {:.0} mm)",
                p.pallets_in_container, p.units_per_pallet, p.units_in_container, p.loaded_pallet_height
            );
        }
    }
    print_json(&capacity);
    Ok(())
}

fn run_import(args: &[String]) -> CalcResult<()> {
    let input: ImportPriceInput = read_json(arg(args, 0, "import.json")?)?;
    input.validate()?;
    let result = compute_import_price(&input)
        .ok_or_else(|| CalcError::calculation_failed("import", "Inputs are incomplete"))?;

    print_header("IMPORT PRICE");
    println!("  Base cost:       {:>12.2} CNY", result.base_cost_cny);
    println!("  Commission:      {:>12.2} CNY", result.commission_cny);
    println!("  Total:           {:>12.2} CNY", result.total_cost_cny);
    println!("  Total:           {:>12.2} USD", result.total_cost_usd);
    println!("  Total:           {:>12} KRW", krw(result.total_cost_krw));
    println!("  Customs fee:     {:>12} KRW", krw(result.customs_fee_krw));
    println!();
    println!("  FINAL IMPORT COST: {} KRW", krw(result.final_import_cost_krw));
    print_json(&result);
    Ok(())
}

fn run_compare(args: &[String], rates: &RateTable) -> CalcResult<()> {
    let first = read_scenario(arg(args, 0, "a.json")?)?;
    let second = read_scenario(arg(args, 1, "b.json")?)?;
    let comparison = compare_scenarios(&first, &second, rates)
        .ok_or_else(|| CalcError::calculation_failed("comparison", "A scenario has incomplete inputs"))?;

    print_header("SCENARIO COMPARISON");
    println!("  1. {:<30} {:>14} KRW", comparison.first.name, krw(comparison.first.cost_krw));
    println!("  2. {:<30} {:>14} KRW", comparison.second.name, krw(comparison.second.cost_krw));
    println!();
    match (comparison.outcome, comparison.cheaper()) {
        (ComparisonOutcome::Cheaper { difference_krw, .. }, Some(cheaper)) => {
            println!("  {} is cheaper by {} KRW", cheaper.name, krw(difference_krw));
        }
        _ => println!("  Both scenarios cost the same."),
    }
    print_json(&comparison);
    Ok(())
}

/// A saved scenario, or a bare tagged calculation labelled with the file name.
fn read_scenario(path: &str) -> CalcResult<Scenario> {
    if let Ok(scenario) = read_json::<Scenario>(path) {
        return Ok(scenario);
    }
    let calculation: ScenarioCalculation = read_json(path)?;
    let label = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok(Scenario::new(label, calculation))
}

fn run_settings(args: &[String], path: &Path) -> CalcResult<()> {
    match args.first().map(String::as_str).unwrap_or("show") {
        "show" => {
            let settings = settings_store::load_or_default(path)?;
            println!("Settings file: {}", path.display());
            print_json(&settings);
            Ok(())
        }
        "reset" => {
            let settings = Settings::default();
            settings_store::save_settings(&settings, path)?;
            println!("Settings reset to defaults: {}", path.display());
            Ok(())
        }
        "path" => {
            println!("{}", path.display());
            Ok(())
        }
        other => Err(CalcError::invalid_input("settings", other, "Expected show, reset or path")),
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_header(title: &str) {
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
}

/// Whole won with thousands separators.
fn krw(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn print_cost(input: &ShipmentInput, cost: &CostBreakdown) {
    print_header("LANDED COST");
    println!();
    println!("Shipment:");
    println!("  Boxes:      {}", cost.total_boxes);
    println!("  Weight:     {:.1} kg", cost.total_weight_kg);
    println!(
        "  Volume:     {:.3} CBM (billed {:.3}{})",
        cost.raw_cbm,
        cost.chargeable_cbm,
        if cost.min_cbm_applied() { ", minimum applied" } else { "" }
    );
    println!("  Mode:       {}", input.shipping.name());
    println!();
    println!("Costs:");
    println!("  Goods:          {:>14} KRW  (${:.2})", krw(cost.total_product_price_krw), cost.total_product_price_usd);
    println!("  Ocean freight:  {:>14} KRW", krw(cost.ocean_freight_krw));
    println!("  Tariff:         {:>14} KRW", krw(cost.tariff_amount_krw));
    println!("  VAT:            {:>14} KRW", krw(cost.vat_amount_krw));
    println!("  Docs + CO:      {:>14} KRW", krw(cost.docs_fee_krw + cost.co_fee_krw));
    println!("  Commission:     {:>14} KRW", krw(cost.commission_amount_krw));
    println!();
    println!("Share of total:");
    for component in cost.components() {
        println!("  {:<24} {:>5.1}%", component.category.label(), component.share * 100.0);
    }
    println!();
    println!("═══════════════════════════════════════");
    println!("  LANDED COST: {} KRW", krw(cost.total_landed_cost_krw));
    match (cost.cost_per_unit_krw, cost.cost_per_box_krw()) {
        (Some(per_unit), _) => println!("  PER UNIT:    {} KRW", krw(per_unit)),
        (None, Some(per_box)) => println!("  PER BOX:     {} KRW", krw(per_box)),
        (None, None) => {}
    }
    println!("═══════════════════════════════════════");
}

fn print_split(analysis: &SplitAnalysis) {
    print_header("SPLIT SHIPMENTS");
    println!();
    println!("  {:>6}  {:<14}  {:>16}", "Ships", "Boxes each", "Total cost KRW");
    for scenario in &analysis.scenarios {
        let range = if scenario.min_boxes() == scenario.max_boxes() {
            scenario.min_boxes().to_string()
        } else {
            format!("{}-{}", scenario.min_boxes(), scenario.max_boxes())
        };
        println!("  {:>6}  {:<14}  {:>16}", scenario.split_count, range, krw(scenario.total_cost_krw));
    }
    println!();
    match analysis.recommended() {
        Some(best) if !analysis.single_shipment_optimal => println!(
            "  Recommended: {} shipments, saving {} KRW",
            best.split_count,
            krw(analysis.savings_vs_baseline_krw)
        ),
        _ => println!("  Ship everything at once: every extra shipment adds more fixed cost than it saves."),
    }
}

fn print_scan(scan: &EfficiencyScan) {
    let unit = match scan.metric {
        EfficiencyMetric::CostPerUnit => "unit",
        EfficiencyMetric::CostPerBox => "box",
    };
    print_header("QUANTITY EFFICIENCY");
    println!();
    println!("  {:>6}  {:>9}  {:>14}  {:>12}", "Boxes", "CBM", "Landed KRW", format!("KRW/{}", unit));
    for point in &scan.points {
        let marker = if point.boxes == scan.current_boxes { " <- current" } else { "" };
        let below = if point.below_min_cbm { "*" } else { " " };
        println!(
            "  {:>6}  {:>8.3}{}  {:>14}  {:>12}{}",
            point.boxes,
            point.raw_cbm,
            below,
            krw(point.total_cost_krw),
            krw(point.metric_krw),
            marker
        );
    }
    println!("  (* below the LCL minimum volume)");
    println!();
    match &scan.recommendation {
        Some(rec) => println!(
            "  Ordering {} more box(es) ({} total) saves {} KRW per {}.",
            rec.additional_boxes,
            rec.boxes,
            krw(rec.saving_krw),
            unit
        ),
        None => println!("  Current quantity is already efficient."),
    }
    if let Some(penalty) = scan.one_box_split_penalty_krw {
        println!("  Shipping one box at a time would cost {} KRW more.", krw(penalty));
    }
}

// ============================================================================
// Interactive demo
// ============================================================================

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn run_demo(rates: &RateTable) -> CalcResult<()> {
    println!("Landed - Import Cost Calculator");
    println!("===============================");
    println!();
    println!("No command given. Running interactive demo (see `landed --help`).");
    println!();

    let units = prompt_f64("Units ordered [1000]: ", 1000.0).max(0.0) as u64;
    let unit_price_usd = prompt_f64("Unit price (USD) [10.0]: ", 10.0);
    let per_box = prompt_f64("Units per box [50]: ", 50.0).max(0.0) as u64;
    let weight_per_box_kg = prompt_f64("Weight per box (kg) [12.0]: ", 12.0);
    let tariff_rate_percent = prompt_f64("Tariff rate (%) [8.0]: ", 8.0);
    let exchange_rate = prompt_f64("Exchange rate (KRW/USD) [1350.0]: ", 1350.0);
    println!();

    let input = ShipmentInput {
        quantity: QuantityMode::ByUnit {
            product_quantity: units,
            unit_price_usd,
            quantity_per_box: per_box,
        },
        weight_per_box_kg,
        shipping: ShippingMode::Lcl,
        tariff_rate_percent,
        commission: Commission::default(),
        exchange_rate_krw_per_usd: exchange_rate,
    };

    let cost = priced(compute_cost(&input, rates), &input)?;
    print_cost(&input, &cost);
    println!();

    if let Some(analysis) = optimize_splits(cost.total_boxes, &input, rates) {
        print_split(&analysis);
        println!();
    }
    if let Some(scan) = scan_efficiency(&input, rates) {
        print_scan(&scan);
    }

    print_json(&cost);
    Ok(())
}
