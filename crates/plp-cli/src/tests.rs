use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["plp"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["plp", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn parses_browse_defaults() {
    let cli = Cli::try_parse_from(["plp", "browse"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Browse { ref query, pages: 1 }) if query.is_empty()
    ));
}

#[test]
fn parses_browse_with_query_and_pages() {
    let cli = Cli::try_parse_from(["plp", "browse", "--query", "phone", "--pages", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Browse { ref query, pages: 3 }) if query == "phone"
    ));
}

#[test]
fn parses_listing_filters() {
    let cli = Cli::try_parse_from([
        "plp",
        "listing",
        "--q",
        "laptop",
        "--min",
        "10",
        "--max",
        "50",
        "--brand",
        "Apple",
        "--brand",
        "Asus",
        "--in-stock",
        "--sort",
        "lh",
        "--page",
        "2",
    ])
    .unwrap();
    let Some(Commands::Listing(args)) = cli.command else {
        panic!("expected listing command");
    };
    let spec = args.to_spec().unwrap();
    assert_eq!(spec.search, "laptop");
    assert_eq!(spec.brands, vec!["Apple", "Asus"]);
    assert!(spec.in_stock);
    assert_eq!(spec.sort, plp_core::SortKey::PriceLowHigh);
    assert_eq!(spec.page, 2);
    assert!(!args.json);
}

#[test]
fn parses_listing_query_string_and_json() {
    let cli = Cli::try_parse_from([
        "plp",
        "listing",
        "--query-string",
        "q=phone&stock=1",
        "--json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Listing(ref args)) if args.json && args.query_string.as_deref() == Some("q=phone&stock=1")
    ));
}

#[test]
fn parses_edit_command() {
    let cli = Cli::try_parse_from(["plp", "edit", "--id", "7", "--price", "12.5", "--stock", "0"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Edit(ref args))
            if args.id == 7 && args.stock == Some(0) && args.title.is_none()
    ));
}

#[test]
fn edit_requires_id() {
    assert!(Cli::try_parse_from(["plp", "edit", "--price", "1"]).is_err());
}

#[test]
fn parses_interactive_command() {
    let cli = Cli::try_parse_from(["plp", "interactive"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Interactive)));
}
