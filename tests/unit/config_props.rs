//! Property tests for identity derivation and shell quoting.

use oceanup::config::{ProjectConfig, ServerIdentity};
use oceanup::shell::quote_arg;
use proptest::prelude::*;

proptest! {
    #[test]
    fn identity_is_always_app_dash_environment(
        app in "[A-Za-z0-9][A-Za-z0-9_-]{0,16}",
        env in "[A-Za-z0-9][A-Za-z0-9_-]{0,16}",
    ) {
        let config = ProjectConfig::new(
            app.clone(),
            "master".to_owned(),
            env.clone(),
            None,
            None,
            false,
            false,
        )
        .expect("generated names are valid");
        let identity = ServerIdentity::derive(&config);
        let expected = format!("{app}-{env}");
        prop_assert_eq!(identity.as_str(), expected.as_str());
    }

    #[test]
    fn names_with_shell_metacharacters_never_construct(
        app in "[A-Za-z0-9]{1,8}[;|&$`'\"<>]{1,3}[A-Za-z0-9]{0,8}",
    ) {
        prop_assert!(ProjectConfig::new(
            app,
            "master".to_owned(),
            "production".to_owned(),
            None,
            None,
            false,
            false,
        )
        .is_err());
    }

    #[test]
    fn quoted_args_never_break_out_of_single_quotes(value in ".*") {
        let quoted = quote_arg(&value);
        // Strip the outer quotes if present; any remaining single quote must
        // be part of the '\'' escape sequence.
        if quoted.starts_with('\'') {
            let inner = &quoted[1..quoted.len() - 1];
            let unescaped = inner.replace("'\\''", "");
            prop_assert!(!unescaped.contains('\''));
        } else {
            prop_assert!(!quoted.contains('\''));
        }
    }
}
