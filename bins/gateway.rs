use std::process::ExitCode;

use campus::{launch, Threads};

fn main() -> ExitCode {
    launch("gateway", Threads::Gateway, gateway::run)
}
