use super::*;

fn parse(args: &[&str]) -> RunArgs {
    let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
    let Command::Run(run) = cli.command;
    run
}

#[test]
fn test_parse_run_minimal() {
    let args = parse(&["kira-spotenrich", "run", "--input", "c.tsv", "--out", "out"]);
    assert_eq!(args.input, PathBuf::from("c.tsv"));
    assert_eq!(args.out, PathBuf::from("out"));
    let p = args.cli_params();
    assert_eq!(p.top_fraction, None);
    assert!(p.top_fraction_overrides.is_empty());
    assert_eq!(p.mix_boundary, None);
}

#[test]
fn test_parse_run_overrides() {
    let args = parse(&[
        "kira-spotenrich",
        "run",
        "--input",
        "c.tsv",
        "--out",
        "out",
        "--sample-column",
        "sample",
        "--top-fraction",
        "0.1",
        "--top-fraction-for",
        "A=0.2",
        "--top-fraction-for",
        "B=0.3",
        "--ratio-for",
        "A=2",
        "--mix-boundary",
        "effective",
    ]);
    let p = args.cli_params();
    assert_eq!(p.top_fraction, Some(0.1));
    assert_eq!(
        p.top_fraction_overrides,
        vec![("A".to_string(), 0.2), ("B".to_string(), 0.3)]
    );
    assert_eq!(p.ratio_overrides, vec![("A".to_string(), 2.0)]);
    assert_eq!(p.sample_column.as_deref(), Some("sample"));
    assert_eq!(p.mix_boundary, Some(MixBoundary::EffectiveRatio));
}

#[test]
fn test_parse_rejects_bad_override() {
    let res = Cli::try_parse_from([
        "kira-spotenrich",
        "run",
        "--input",
        "c.tsv",
        "--out",
        "out",
        "--ratio-for",
        "A",
    ]);
    assert!(res.is_err());
}

#[test]
fn test_run_end_to_end() {
    let dir = std::env::temp_dir().join(format!("kira_spotenrich_main_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("counts.tsv");
    std::fs::write(&input, "spot\tA\tB\ns1\t10\t1\ns2\t9\t8\ns3\t1\t1\n").unwrap();
    let out = dir.join("out");

    let args = parse(&[
        "kira-spotenrich",
        "run",
        "--input",
        input.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--top-fraction",
        "0.5",
    ]);
    run(&args).unwrap();

    let labels = std::fs::read_to_string(out.join("spot_labels.tsv")).unwrap();
    assert_eq!(labels, "barcode\tCelltype\ns1\tA\ns2\tA\ns3\tMix\n");
}
