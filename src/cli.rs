use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "kandie",
    version,
    about = "Pick a Kubernetes resource and describe it in color."
)]
pub struct CliArgs {
    /// Resource to describe, as <kind> or <kind>/<name>
    pub resource: String,

    /// Resource name, when not given as <kind>/<name>
    pub name: Option<String>,

    /// If present, the namespace scope for this request
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// The name of the kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Path to the kubeconfig file to use
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "warn")]
    pub log_filter: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Target {
    pub kind: String,
    pub name: Option<String>,
}

impl Target {
    // A name in the resource token wins over the separate positional name.
    pub fn parse(resource: &str, name: Option<&str>) -> Self {
        let mut segments = resource.split('/');
        let kind = segments.next().unwrap_or_default();
        let name = segments
            .next()
            .or(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Self {
            kind: kind.trim().to_string(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, Target};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn kind_with_inline_name_skips_picker() {
        let target = Target::parse("pod/web-1", None);
        assert_eq!(target.kind, "pod");
        assert_eq!(target.name.as_deref(), Some("web-1"));
    }

    #[test]
    fn inline_name_wins_over_positional_name() {
        let target = Target::parse("pod/web-1", Some("web-2"));
        assert_eq!(target.name.as_deref(), Some("web-1"));
        let target = Target::parse("pod", Some("web-2"));
        assert_eq!(target.name.as_deref(), Some("web-2"));
    }

    #[test]
    fn extra_segments_after_the_name_are_ignored() {
        let target = Target::parse("pod/web-1/extra", None);
        assert_eq!(target.kind, "pod");
        assert_eq!(target.name.as_deref(), Some("web-1"));
    }

    #[test]
    fn empty_names_mean_no_name() {
        assert_eq!(Target::parse("pod/", None).name, None);
        assert_eq!(Target::parse("pod", Some("  ")).name, None);
        assert_eq!(Target::parse("pods", None).kind, "pods");
    }

    #[test]
    fn flags_parse() {
        let args = CliArgs::try_parse_from([
            "kandie",
            "pod/web-1",
            "-n",
            "shop",
            "--context",
            "staging",
            "--kubeconfig",
            "/tmp/config",
        ])
        .expect("args");
        assert_eq!(args.resource, "pod/web-1");
        assert_eq!(args.namespace.as_deref(), Some("shop"));
        assert_eq!(args.context.as_deref(), Some("staging"));
        assert_eq!(args.kubeconfig, Some(PathBuf::from("/tmp/config")));
        assert_eq!(args.log_filter, "warn");
    }

    #[test]
    fn resource_is_required() {
        assert!(CliArgs::try_parse_from(["kandie"]).is_err());
    }
}
