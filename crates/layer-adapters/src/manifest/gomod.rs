//! `go.mod`

use std::fmt::{self, Write};

use layer_core::domain::ModuleManifest;

pub fn render(manifest: &ModuleManifest) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "module {}", manifest.module)?;
    writeln!(out)?;
    writeln!(out, "go {}", manifest.go_version)?;

    if !manifest.dependencies.is_empty() {
        writeln!(out)?;
        writeln!(out, "require (")?;
        for dep in &manifest.dependencies {
            writeln!(out, "\t{} {}", dep.path, dep.version)?;
        }
        writeln!(out, ")")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_core::domain::{Service, Variant};

    #[test]
    fn broker_module_requires_messaging() {
        let manifest = ModuleManifest::for_service(&Service::new("broker-service", Variant::Broker));
        let text = render(&manifest).unwrap();

        assert!(text.starts_with("module broker-service\n\ngo 1.23\n\nrequire (\n"));
        assert!(text.contains("\tgithub.com/rabbitmq/amqp091-go v1.10.0\n"));
        assert!(text.contains("\tgithub.com/google/uuid v1.6.0\n"));
        assert!(text.ends_with(")\n"));
    }
}
