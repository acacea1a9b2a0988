use std::process::ExitCode;

use campus::{launch, Threads};
use server::ServiceKind;

fn main() -> ExitCode {
    launch("student-service", Threads::Service, |cfg| server::run(ServiceKind::Student, cfg))
}
