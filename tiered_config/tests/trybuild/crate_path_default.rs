use tiered_config::{Populate, Provider, ROOT, TreeProvider};

/// Derived with the default `::tiered_config` path.
#[derive(Debug, Default, Populate)]
#[config(crate = "tiered_config")]
struct Named {
    #[config(required)]
    name: String,
}

fn main() {
    let tree = TreeProvider::from_yaml_sources("inline", ["name: demo\n"]);
    let Ok(tree) = tree else { return };
    let mut named = Named::default();
    let outcome: tiered_config::DecodeResult<()> = tree.get(ROOT).populate(&mut named);
    let _ = outcome;
}
