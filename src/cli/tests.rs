use super::*;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn complete_collects_repeated_edits() {
    let args = parse_args(&[
        "palaver",
        "complete",
        "--prompt",
        "prompt.json",
        "--edit",
        "0=You are terse",
        "--edit",
        "2=Say hi",
        "--add-message",
    ]);
    match args.command {
        Commands::Complete {
            prompt,
            edits,
            add_message,
        } => {
            assert_eq!(prompt, std::path::PathBuf::from("prompt.json"));
            assert_eq!(
                edits,
                vec![(0, "You are terse".to_string()), (2, "Say hi".to_string())]
            );
            assert!(add_message);
        }
        _ => panic!("expected complete subcommand"),
    }
}

#[test]
fn complete_rejects_malformed_edits() {
    let result = Args::try_parse_from([
        "palaver", "complete", "--prompt", "p.json", "--edit", "first=x",
    ]);
    assert!(result.is_err());
}

#[test]
fn conversations_flags_parse() {
    let args = parse_args(&[
        "palaver",
        "conversations",
        "--search",
        "refund",
        "--feedback",
        "-1",
        "--first",
        "5",
        "--all",
        "-v",
    ]);
    assert!(args.verbose);
    match args.command {
        Commands::Conversations {
            search,
            author,
            feedback,
            first,
            cursor,
            all,
        } => {
            assert_eq!(search.as_deref(), Some("refund"));
            assert_eq!(author, None);
            assert_eq!(feedback, Some(-1));
            assert_eq!(first, Some(5));
            assert_eq!(cursor, None);
            assert!(all);
        }
        _ => panic!("expected conversations subcommand"),
    }
}

#[test]
fn theme_variants_parse_case_insensitively() {
    let args = parse_args(&["palaver", "theme", "--variant", "LIGHT"]);
    assert!(matches!(
        args.command,
        Commands::Theme {
            variant: Some(ThemeVariant::Light)
        }
    ));
    assert!(Args::try_parse_from(["palaver", "logo-url", "--theme", "sepia"]).is_err());
}

#[test]
fn config_set_keeps_trailing_values() {
    let args = parse_args(&["palaver", "config", "set", "user-env", "TOKEN=-abc"]);
    match args.command {
        Commands::Config {
            command: ConfigCommands::Set { key, value },
        } => {
            assert_eq!(key, "user-env");
            assert_eq!(value, vec!["TOKEN=-abc".to_string()]);
        }
        _ => panic!("expected config set"),
    }

    let args = parse_args(&["palaver", "config", "unset", "user-env", "TOKEN"]);
    assert!(matches!(
        args.command,
        Commands::Config {
            command: ConfigCommands::Unset { value: Some(_), .. }
        }
    ));
}

#[test]
fn feedback_accepts_negative_scores() {
    let args = parse_args(&["palaver", "feedback", "m-1", "-1", "--comment", "wrong"]);
    match args.command {
        Commands::Feedback {
            message_id,
            score,
            comment,
        } => {
            assert_eq!(message_id, "m-1");
            assert_eq!(score, -1);
            assert_eq!(comment.as_deref(), Some("wrong"));
        }
        _ => panic!("expected feedback subcommand"),
    }
}

#[test]
fn login_requires_username() {
    assert!(Args::try_parse_from(["palaver", "login"]).is_err());
    let args = parse_args(&["palaver", "login", "-u", "ada"]);
    assert!(matches!(
        args.command,
        Commands::Login { password: None, .. }
    ));
}
