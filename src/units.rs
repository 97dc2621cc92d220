//! Code units linked into every consolekit host.
//!
//! Hosts register their own entry unit referencing [`UNIT_NAME`] so the
//! preloader reaches the whole workspace.

use consolekit_shadow::code_unit;

/// Name of the facade unit.
pub const UNIT_NAME: &str = "consolekit";

code_unit!(
    UNIT_NAME,
    references = [
        "consolekit-kernel",
        "consolekit-telemetry",
        "consolekit-shadow"
    ]
);
code_unit!("consolekit-kernel", references = []);
code_unit!("consolekit-telemetry", references = ["consolekit-kernel"]);
code_unit!("consolekit-shadow", references = []);
