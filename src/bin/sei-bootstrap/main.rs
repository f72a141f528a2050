//! Main entry point for the `sei-bootstrap` executable

use sei_bootstrap::application::APP;

/// Boot the `sei-bootstrap` application
fn main() {
    abscissa_core::boot(&APP);
}
