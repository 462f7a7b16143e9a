//! Integration tests for the full analysis over chart directories on disk

use deadvalues::{analyze_chart, load_chart, read_templates, Config, Error, LeafPath, ValuesAnalyzer};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Build a chart directory from (relative path, contents) pairs
fn chart(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }
    dir
}

fn keys(paths: &[&str]) -> Vec<LeafPath> {
    paths.iter().map(|p| LeafPath::from(*p)).collect()
}

fn with_overrides(files: &[&str]) -> Config {
    Config {
        additional_values: files.iter().map(|f| f.into()).collect(),
        ..Config::default()
    }
}

// ============================================================================
// Base + override scenarios
// ============================================================================

mod layered_values {
    use super::*;

    fn layered_chart(template: &str) -> TempDir {
        chart(&[
            ("values.yaml", "a:\n  b: 1\n  c: 2\n"),
            ("values-override.yaml", "a:\n  c: 3\n  d: 4\n"),
            ("templates/configmap.yaml", template),
        ])
    }

    #[test]
    fn test_ancestor_reference_uses_all_children() {
        let dir = layered_chart("data:\n  b: {{ .Values.a.b }}\n  all: {{ toYaml .Values.a }}\n");
        let analysis = analyze_chart(dir.path(), &with_overrides(&["values-override.yaml"])).unwrap();

        assert_eq!(analysis.keys, keys(&["a.b", "a.c", "a.d"]));
        assert!(analysis.unused.is_empty());
        assert!(analysis.report.is_empty());
    }

    #[test]
    fn test_unused_keys_attributed_to_override() {
        let dir = layered_chart("data:\n  b: {{ .Values.a.b }}\n");
        let analysis = analyze_chart(dir.path(), &with_overrides(&["values-override.yaml"])).unwrap();

        assert_eq!(analysis.unused, keys(&["a.c", "a.d"]));
        assert_eq!(
            analysis.report.get("values-override.yaml").unwrap(),
            keys(&["a.c", "a.d"]).as_slice()
        );
        assert!(analysis.report.get("values.yaml").is_none());
    }

    #[test]
    fn test_without_override_base_owns_everything() {
        let dir = layered_chart("{{ .Values.a.b }}");
        let analysis = analyze_chart(dir.path(), &Config::default()).unwrap();

        assert_eq!(analysis.unused, keys(&["a.c"]));
        assert_eq!(analysis.report.get("values.yaml").unwrap(), keys(&["a.c"]).as_slice());
    }

    #[test]
    fn test_override_order_decides_provenance() {
        let dir = chart(&[
            ("values.yaml", "x: 0\n"),
            ("values-a.yaml", "x: 1\n"),
            ("values-b.yaml", "x: 2\n"),
            ("templates/empty.yaml", "kind: ConfigMap\n"),
        ]);

        let ab = analyze_chart(dir.path(), &with_overrides(&["values-a.yaml", "values-b.yaml"])).unwrap();
        assert!(ab.report.get("values-b.yaml").is_some());

        let ba = analyze_chart(dir.path(), &with_overrides(&["values-b.yaml", "values-a.yaml"])).unwrap();
        assert!(ba.report.get("values-a.yaml").is_some());
    }
}

// ============================================================================
// Template scanning over a realistic chart
// ============================================================================

mod realistic_chart {
    use super::*;

    const VALUES: &str = r#"
replicaCount: 1
image:
  repository: nginx
  pullPolicy: IfNotPresent
  tag: ""
imagePullSecrets: []
serviceAccount:
  create: true
  annotations: {}
  name: ""
podAnnotations: {}
service:
  type: ClusterIP
  port: 80
ingress:
  enabled: false
  className: ""
  hosts:
    - host: chart-example.local
resources: {}
autoscaling:
  enabled: false
  minReplicas: 1
  maxReplicas: 100
legacy:
  oldFlag: true
"#;

    const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
spec:
  {{- if not .Values.autoscaling.enabled }}
  replicas: {{ .Values.replicaCount }}
  {{- end }}
  template:
    spec:
      {{- with .Values.imagePullSecrets }}
      imagePullSecrets:
        {{- toYaml . | nindent 8 }}
      {{- end }}
      serviceAccountName: {{ include "chart.serviceAccountName" . }}
      containers:
        - image: "{{ .Values.image.repository }}:{{ .Values.image.tag | default .Chart.AppVersion }}"
          imagePullPolicy: {{ .Values.image.pullPolicy }}
          ports:
            - containerPort: {{ .Values.service.port }}
"#;

    const HELPERS: &str = r#"
{{- define "chart.serviceAccountName" -}}
{{- if .Values.serviceAccount.create }}
{{- default (include "chart.fullname" .) .Values.serviceAccount.name }}
{{- end }}
{{- end }}
"#;

    const SERVICE: &str = r#"
spec:
  type: {{ .Values.service.type }}
"#;

    const INGRESS: &str = r#"
{{- if .Values.ingress.enabled -}}
{{- range .Values.ingress.hosts }}
- host: {{ .host | quote }}
{{- end }}
{{- end }}
"#;

    fn realistic() -> TempDir {
        chart(&[
            ("values.yaml", VALUES),
            ("templates/deployment.yaml", DEPLOYMENT),
            ("templates/_helpers.tpl", HELPERS),
            ("templates/service.yaml", SERVICE),
            ("templates/ingress.yaml", INGRESS),
            ("templates/NOTES.txt", "{{ .Values.legacy.oldFlag }}"),
        ])
    }

    #[test]
    fn test_finds_unused_keys() {
        let dir = realistic();
        let analysis = analyze_chart(dir.path(), &Config::default()).unwrap();

        assert_eq!(
            analysis.unused,
            keys(&[
                "ingress.className",
                "autoscaling.minReplicas",
                "autoscaling.maxReplicas",
                "legacy.oldFlag",
            ])
        );
        assert_eq!(analysis.templates_scanned, 4);
    }

    #[test]
    fn test_extra_extension_scans_notes() {
        let dir = realistic();
        let config = Config {
            template_extensions: vec!["yaml".into(), "tpl".into(), "txt".into()],
            ..Config::default()
        };
        let analysis = analyze_chart(dir.path(), &config).unwrap();
        assert!(!analysis.unused.contains(&LeafPath::from("legacy.oldFlag")));
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = realistic();
        let config = Config {
            ignore: vec!["autoscaling".into(), "legacy*".into()],
            ..Config::default()
        };
        let analysis = analyze_chart(dir.path(), &config).unwrap();
        assert_eq!(analysis.unused, keys(&["ingress.className"]));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let dir = realistic();
        let parallel = analyze_chart(dir.path(), &Config::default()).unwrap();
        let sequential = analyze_chart(
            dir.path(),
            &Config {
                parallel: false,
                ..Config::default()
            },
        )
        .unwrap();
        assert_eq!(parallel.unused, sequential.unused);
        assert_eq!(parallel.references, sequential.references);
    }

    #[test]
    fn test_whole_values_passed_to_helper() {
        let dir = realistic();
        fs::write(
            dir.path().join("templates/secret.yaml"),
            "data: {{ include \"chart.render\" (dict \"values\" .Values) }}\n",
        )
        .unwrap();
        let analysis = analyze_chart(dir.path(), &Config::default()).unwrap();
        assert!(analysis.references.has_root());
        assert!(analysis.report.is_empty());
    }

    #[test]
    fn test_comment_mentioning_values_is_not_a_reference() {
        let dir = realistic();
        fs::write(
            dir.path().join("templates/NOTES.yaml"),
            "{{/* Values consumed by this chart are documented in README */}}\n",
        )
        .unwrap();
        let analysis = analyze_chart(dir.path(), &Config::default()).unwrap();
        assert!(!analysis.references.has_root());
        assert!(analysis.unused.contains(&LeafPath::from("legacy.oldFlag")));
    }

    #[test]
    fn test_staged_loading_matches_analyze_chart() {
        let dir = realistic();
        let config = Config::default();

        let inputs = load_chart(dir.path(), &config).unwrap();
        assert_eq!(inputs.documents.len(), 1);
        assert_eq!(inputs.templates.len(), 4);

        let templates = read_templates(&inputs.templates, false).unwrap();
        let staged = ValuesAnalyzer::new(&config)
            .unwrap()
            .analyze(&inputs.documents, &templates);
        let direct = analyze_chart(dir.path(), &config).unwrap();
        assert_eq!(staged.unused, direct.unused);
        assert_eq!(staged.templates_scanned, direct.templates_scanned);
    }
}

// ============================================================================
// YAML anchors and merge keys
// ============================================================================

mod anchors {
    use super::*;

    #[test]
    fn test_merge_key_paths_resolve_to_target() {
        let dir = chart(&[
            ("values.yaml", "defaults: &d\n  cpu: 1\napp:\n  <<: *d\n  name: x\n"),
            ("templates/a.yaml", "cpu: {{ .Values.app.cpu }}\nname: {{ .Values.app.name }}\n"),
        ]);
        let analysis = analyze_chart(dir.path(), &Config::default()).unwrap();

        assert!(analysis.keys.iter().all(|k| !k.as_str().contains("<<")));
        assert_eq!(analysis.unused, keys(&["defaults.cpu"]));
    }
}

// ============================================================================
// Failure handling
// ============================================================================

mod failures {
    use super::*;

    #[test]
    fn test_missing_override_aborts() {
        let dir = chart(&[("values.yaml", "a: 1\n"), ("templates/a.yaml", "")]);
        let err = analyze_chart(dir.path(), &with_overrides(&["values-missing.yaml"])).unwrap_err();
        assert!(matches!(err, Error::AdditionalValuesNotFound(_)));
    }

    #[test]
    fn test_non_mapping_values_rejected() {
        let dir = chart(&[("values.yaml", "- a\n- b\n"), ("templates/a.yaml", "")]);
        let err = analyze_chart(dir.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDocumentShape { .. }));
    }

    #[test]
    fn test_broken_yaml_names_the_file() {
        let dir = chart(&[
            ("values.yaml", "a: 1\n"),
            ("values-bad.yaml", "a: [unclosed\n"),
            ("templates/a.yaml", ""),
        ]);
        let err = analyze_chart(dir.path(), &with_overrides(&["values-bad.yaml"])).unwrap_err();
        assert!(err.to_string().contains("values-bad.yaml"));
    }

    #[test]
    fn test_missing_chart() {
        let err = analyze_chart(Path::new("/definitely/not/a/chart"), &Config::default()).unwrap_err();
        assert!(matches!(err, Error::ValuesFileNotFound(_)));
    }
}
