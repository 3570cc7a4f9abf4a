//! Mock command CLI handler.

use crate::writer::OutputWriter;
use fixture_gen::{FixtureConfig, GeneratedData, Generator, Quoting, RenderConfig, Renderer};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

pub struct MockArgs {
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub students: Option<usize>,
    pub tutors: Option<usize>,
    pub admins: Option<usize>,
    pub sheets: Option<usize>,
    pub tasks_per_sheet: Option<usize>,
    pub groups: Option<usize>,
    pub materials: Option<usize>,
    pub material_course: Option<usize>,
    pub group_course: Option<usize>,
    pub legacy_quoting: bool,
    pub progress: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// JSON output for mock command
#[derive(Serialize)]
struct MockJsonOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    seed: u64,
    dry_run: bool,
    statistics: MockStatistics,
    tables: Vec<TableCount>,
}

#[derive(Serialize)]
struct MockStatistics {
    tables: usize,
    total_rows: usize,
    elapsed_secs: f64,
}

#[derive(Serialize)]
struct TableCount {
    name: String,
    rows: usize,
}

/// File config with command line overrides applied
fn resolve_config(args: &MockArgs) -> anyhow::Result<FixtureConfig> {
    let mut config = match &args.config {
        Some(path) => FixtureConfig::load(path)?,
        None => FixtureConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let counts = &mut config.counts;
    for (value, target) in [
        (args.students, &mut counts.students),
        (args.tutors, &mut counts.tutors),
        (args.admins, &mut counts.admins),
        (args.sheets, &mut counts.sheets),
        (args.tasks_per_sheet, &mut counts.tasks_per_sheet),
        (args.materials, &mut counts.materials),
    ] {
        if let Some(value) = value {
            *target = value;
        }
    }
    if args.groups.is_some() {
        counts.groups = args.groups;
    }
    if let Some(position) = args.material_course {
        config.material_course = position;
    }
    if let Some(position) = args.group_course {
        config.group_course = position;
    }
    if args.legacy_quoting {
        config.quoting = Quoting::Legacy;
    }

    Ok(config)
}

pub fn run(args: MockArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let seed = config.seed;
    let start_time = Instant::now();

    let mut generator = Generator::new(config);
    let data = generator.generate()?;

    if !args.dry_run {
        write_fixture(&data, &args, generator.config().quoting)?;
    }

    let elapsed = start_time.elapsed();

    if args.json {
        let output_json = MockJsonOutput {
            output_file: args.output.as_ref().map(|p| p.display().to_string()),
            seed,
            dry_run: args.dry_run,
            statistics: MockStatistics {
                tables: data.tables.len(),
                total_rows: data.total_rows(),
                elapsed_secs: elapsed.as_secs_f64(),
            },
            tables: data
                .tables
                .iter()
                .map(|t| TableCount {
                    name: t.table.to_string(),
                    rows: t.len(),
                })
                .collect(),
        };
        // SQL already went to stdout unless a file was given
        if args.output.is_some() || args.dry_run {
            println!("{}", serde_json::to_string_pretty(&output_json)?);
        } else {
            eprintln!("{}", serde_json::to_string_pretty(&output_json)?);
        }
    } else if args.dry_run {
        println!("Tables to generate (seed {}):", seed);
        for table in &data.tables {
            println!("  {:<16} {:>8} rows", table.table.name(), table.len());
        }
        println!("  {:<16} {:>8} rows", "total", data.total_rows());
        println!("\nDry run complete. No files written.");
    } else if let Some(path) = &args.output {
        eprintln!(
            "Generated {} rows in {} tables to {} ({:.2}s)",
            data.total_rows(),
            data.tables.len(),
            path.display(),
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}

fn write_fixture(data: &GeneratedData, args: &MockArgs, quoting: Quoting) -> anyhow::Result<()> {
    let renderer = Renderer::new(RenderConfig::postgres().with_quoting(quoting));
    let mut out = OutputWriter::create(args.output.as_deref())?;

    let progress_bar = if args.progress {
        let pb = ProgressBar::new(data.tables.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("█▓▒░  "),
        );
        Some(pb)
    } else {
        None
    };

    renderer.write_header(&mut out)?;
    for table in &data.tables {
        if let Some(ref pb) = progress_bar {
            pb.set_message(table.table.name());
        }
        renderer.write_table(&mut out, table)?;
        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }
    renderer.write_footer(&mut out)?;
    out.finish()?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MockArgs {
        MockArgs {
            output: None,
            config: None,
            seed: None,
            students: None,
            tutors: None,
            admins: None,
            sheets: None,
            tasks_per_sheet: None,
            groups: None,
            materials: None,
            material_course: None,
            group_course: None,
            legacy_quoting: false,
            progress: false,
            dry_run: false,
            json: false,
        }
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = resolve_config(&args()).unwrap();
        assert_eq!(config, FixtureConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let config = resolve_config(&MockArgs {
            seed: Some(9),
            students: Some(3),
            tasks_per_sheet: Some(2),
            groups: Some(1),
            group_course: Some(2),
            legacy_quoting: true,
            ..args()
        })
        .unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.counts.students, 3);
        assert_eq!(config.counts.tasks_per_sheet, 2);
        assert_eq!(config.counts.groups(), 1);
        assert_eq!(config.counts.tutors, 10);
        assert_eq!(config.group_course, 2);
        assert_eq!(config.material_course, 1);
        assert_eq!(config.quoting, Quoting::Legacy);
    }

    fn small_config_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("mock.yaml");
        std::fs::write(
            &path,
            "seed: 2\npassword_cost: 4\ncounts:\n  tutors: 1\n  students: 2\n  sheets: 1\n  tasks_per_sheet: 1\n  materials: 1\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_run_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("mock.sql");

        run(MockArgs {
            output: Some(output.clone()),
            config: Some(small_config_file(&dir)),
            ..args()
        })
        .unwrap();

        let sql = std::fs::read_to_string(&output).unwrap();
        assert!(sql.starts_with("BEGIN;\nDELETE FROM users;\n"));
        assert!(sql.ends_with("COMMIT;\n"));
        assert!(sql.lines().all(|l| l.ends_with(';')));
    }

    #[test]
    fn test_run_uses_quoting_from_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = small_config_file(&dir);
        let mut yaml = std::fs::read_to_string(&config).unwrap();
        yaml.push_str("quoting: legacy\n");
        std::fs::write(&config, yaml).unwrap();
        let output = dir.path().join("mock.sql");

        run(MockArgs {
            output: Some(output.clone()),
            config: Some(config),
            ..args()
        })
        .unwrap();

        let sql = std::fs::read_to_string(&output).unwrap();
        assert!(!sql.contains("E'"));
        assert!(sql.lines().any(|l| l.starts_with("[ FAILED ] AckermannValueTest:")));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("mock.sql");

        run(MockArgs {
            output: Some(output.clone()),
            config: Some(small_config_file(&dir)),
            dry_run: true,
            json: true,
            ..args()
        })
        .unwrap();

        assert!(!output.exists());
    }
}
