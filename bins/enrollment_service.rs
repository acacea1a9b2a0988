use std::process::ExitCode;

use campus::{launch, Threads};
use server::ServiceKind;

fn main() -> ExitCode {
    launch("enrollment-service", Threads::Service, |cfg| server::run(ServiceKind::Enrollment, cfg))
}
