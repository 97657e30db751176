use tiered_config as cfg;

use cfg::{Populate, Provider, ROOT, TreeProvider};

/// Derived through an alias of the runtime crate.
#[derive(Debug, Default, Populate)]
#[config(crate = "cfg", rename_all = "kebab-case")]
struct Aliased {
    listen_port: u16,
    #[config(default = "aliased")]
    label: String,
}

fn main() {
    let tree = TreeProvider::from_yaml_sources("inline", ["listen-port: 8080\n"]);
    let Ok(tree) = tree else { return };
    let mut aliased = Aliased::default();
    let outcome: cfg::DecodeResult<()> = tree.get(ROOT).populate(&mut aliased);
    let _ = outcome;
}
