use std::process::ExitCode;

use campus::{launch, Threads};
use server::ServiceKind;

fn main() -> ExitCode {
    launch("course-service", Threads::Service, |cfg| server::run(ServiceKind::Course, cfg))
}
