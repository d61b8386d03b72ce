//! Per-service multi-stage `Dockerfile`.

use std::fmt::{self, Write};

use layer_core::domain::ModuleManifest;

/// Runtime base image of the final stage.
const RUNTIME_IMAGE: &str = "alpine:3.20";

pub fn render(manifest: &ModuleManifest) -> Result<String, fmt::Error> {
    let binary = format!("/bin/{}", manifest.module);
    let mut out = String::new();

    writeln!(out, "FROM golang:{}-alpine AS builder", manifest.go_version)?;
    writeln!(out)?;
    writeln!(out, "WORKDIR /app")?;
    writeln!(out, "COPY . .")?;
    // No go.sum is generated, tidy resolves it inside the build
    writeln!(out, "RUN go mod tidy && CGO_ENABLED=0 go build -o {binary} .")?;
    writeln!(out)?;
    writeln!(out, "FROM {RUNTIME_IMAGE}")?;
    writeln!(out)?;
    writeln!(out, "COPY --from=builder {binary} {binary}")?;
    writeln!(out, "CMD [\"{binary}\"]")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_core::domain::{Service, Variant};

    #[test]
    fn build_stage_follows_go_version() {
        let manifest = ModuleManifest::for_service(&Service::new("auth-service", Variant::Api))
            .with_go_version("1.22");
        let text = render(&manifest).unwrap();

        assert!(text.starts_with("FROM golang:1.22-alpine AS builder\n"));
        assert!(text.contains("COPY --from=builder /bin/auth-service /bin/auth-service\n"));
        assert!(text.ends_with("CMD [\"/bin/auth-service\"]\n"));
    }
}
