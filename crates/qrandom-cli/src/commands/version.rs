//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - random integers from qubit measurements",
        style("qrandom").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qrandom-ir    Coin-flip circuit representation");
    println!("  qrandom-hal   Backend abstraction layer");
    println!("  qrandom-core  Qubit emulation, bit sources, integer assembly");
    println!("  qrandom-cli   Command-line interface");
    println!();
    println!("Methods:");
    for method in qrandom_core::Method::ALL {
        println!("  {:<14} {}", method.as_str(), method.label());
    }
    if !cfg!(feature = "ibm") {
        println!("  {}", style("(real: built without the 'ibm' feature)").dim());
    }
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
