//! Example classification walkthrough
//!
//! Prints representative packages for every dispatch category plus the
//! boundary and error-handling cases, with dimensions, volume, mass, and
//! the resulting label. Intended as a quick demonstration of the decision
//! rule feeding the sorting arm.

use clap::Parser;
use sorter_poc::domain::{classify, PackageMeasurement};

#[derive(Parser, Debug)]
#[command(name = "sort_demo", about = "Package classification walkthrough")]
struct Args {
    /// Limit output to one section: standard, special, rejected, boundary, errors
    #[arg(long)]
    section: Option<String>,
}

impl Args {
    fn wants(&self, section: &str) -> bool {
        self.section.as_deref().map(|s| s == section).unwrap_or(true)
    }
}

/// Group digits of the integer part in threes: 1000000 -> "1,000,000"
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value);
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn print_classification(width: f64, height: f64, length: f64, mass: f64, description: &str) {
    println!("{}", "=".repeat(70));
    println!("Scenario: {}", description);
    println!("Dimensions: {} × {} × {} cm", width, height, length);

    match PackageMeasurement::new(width, height, length, mass) {
        Ok(package) => {
            println!("Volume: {} cm³", group_thousands(package.volume()));
            println!("Mass: {} kg", mass);
            println!("Classification: {}", package.classification());
        }
        Err(err) => {
            println!("Mass: {} kg", mass);
            println!("Error: {}", err);
        }
    }
    println!();
}

fn section_header(title: &str) {
    println!("\n### {} ###\n", title);
}

fn main() {
    let args = Args::parse();

    println!("\n╔══════════════════════════════════════════════════════════╗");
    println!("║          PACKAGE SORTER - EXAMPLE USAGE                  ║");
    println!("╚══════════════════════════════════════════════════════════╝");

    if args.wants("standard") {
        section_header("STANDARD PACKAGES");
        print_classification(30.0, 20.0, 40.0, 2.0, "Small electronics package");
        print_classification(45.0, 35.0, 8.0, 3.5, "Laptop shipping box");
        print_classification(100.0, 100.0, 99.0, 19.99, "Just below all thresholds");
    }

    if args.wants("special") {
        section_header("SPECIAL PACKAGES (BULKY)");
        print_classification(100.0, 100.0, 100.0, 15.0, "Bulky by volume (exactly 1,000,000 cm³)");
        print_classification(150.0, 50.0, 50.0, 15.0, "Bulky by width (150 cm dimension)");
        print_classification(160.0, 90.0, 15.0, 18.0, "Large TV - bulky by dimension");
        print_classification(120.0, 100.0, 85.0, 15.0, "Large box - bulky by volume");

        section_header("SPECIAL PACKAGES (HEAVY)");
        print_classification(50.0, 50.0, 50.0, 20.0, "Heavy at exact threshold (20 kg)");
        print_classification(40.0, 30.0, 30.0, 45.0, "Industrial machinery part");
        print_classification(30.0, 30.0, 30.0, 100.0, "Very heavy small package");
    }

    if args.wants("rejected") {
        section_header("REJECTED PACKAGES (BULKY AND HEAVY)");
        print_classification(100.0, 100.0, 100.0, 20.0, "Bulky by volume AND heavy");
        print_classification(150.0, 50.0, 50.0, 25.0, "Bulky by dimension AND heavy");
        print_classification(180.0, 120.0, 90.0, 35.0, "Large furniture shipment");
        print_classification(200.0, 200.0, 200.0, 50.0, "Extremely bulky and heavy");
    }

    if args.wants("boundary") {
        section_header("BOUNDARY CONDITIONS");
        print_classification(149.99, 10.0, 10.0, 15.0, "Just below dimension threshold");
        print_classification(150.0, 10.0, 10.0, 15.0, "Exactly at dimension threshold");
        print_classification(10.0, 10.0, 10.0, 19.99, "Just below mass threshold");
        print_classification(10.0, 10.0, 10.0, 20.0, "Exactly at mass threshold");
    }

    if args.wants("errors") {
        section_header("ERROR HANDLING");

        println!("Attempting to classify a package with a negative dimension...");
        if let Err(err) = classify(-10.0, 50.0, 50.0, 10.0) {
            println!("Caught: {}\n", err);
        }

        println!("Attempting to classify a package with zero mass...");
        if let Err(err) = classify(50.0, 50.0, 50.0, 0.0) {
            println!("Caught: {}\n", err);
        }

        println!("Attempting to classify a package with a non-numeric width...");
        if let Err(err) = classify(f64::NAN, 50.0, 50.0, 10.0) {
            println!("Caught: {}\n", err);
        }
    }

    println!("{}", "=".repeat(70));
    println!("Classification rules:");
    println!("  STANDARD: not bulky and not heavy");
    println!("  SPECIAL:  either bulky or heavy (but not both)");
    println!("  REJECTED: both bulky and heavy");
    println!("Bulky: volume ≥ 1,000,000 cm³ OR any dimension ≥ 150 cm");
    println!("Heavy: mass ≥ 20 kg");
    println!("{}", "=".repeat(70));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(24_000.0), "24,000");
        assert_eq!(group_thousands(1_000_000.0), "1,000,000");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(0.0), "0");
    }
}
