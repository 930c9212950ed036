//! crewpay main entrypoint.

use crewpay::run;
use crewpay::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
