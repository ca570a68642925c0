// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use mockshell::command::{
    AnimationKind, ArtForm, Classifier, CommandCategory, CommandSets, DEFAULT_FIGURE_CAPTION,
    DEFAULT_FIGURE_STYLE,
};
use mockshell::prompt::PromptBuilder;
use proptest::prelude::*;

fn classify(raw: &str) -> CommandCategory {
    Classifier::default().classify(raw)
}

#[test]
fn test_every_dangerous_token_is_rejected() {
    let sets = CommandSets::standard();
    for token in &sets.dangerous {
        assert_eq!(
            classify(token),
            CommandCategory::DangerousRejected,
            "{token} must be rejected"
        );
        assert_eq!(
            classify(&format!("{} --help", token.to_uppercase())),
            CommandCategory::DangerousRejected
        );
    }
}

#[test]
fn test_dangerous_overlaps_valid_on_purpose() {
    let sets = CommandSets::standard();
    assert!(sets.is_valid("rm") && sets.is_dangerous("rm"));
    assert!(sets.is_valid("sudo") && sets.is_dangerous("sudo"));
}

#[test]
fn test_precedence_of_builtins() {
    assert_eq!(classify("clear"), CommandCategory::BuiltinClear);
    assert_eq!(classify("HELP me"), CommandCategory::BuiltinHelp);
    assert_eq!(
        classify("oneko"),
        CommandCategory::BuiltinToggleAnimation(AnimationKind::Pet)
    );
    assert_eq!(
        classify("sl -l"),
        CommandCategory::AnimationTrigger(AnimationKind::Train)
    );
    assert_eq!(
        classify("dashboard"),
        CommandCategory::AnimationTrigger(AnimationKind::Dashboard)
    );
}

#[test]
fn test_foreign_script_beats_everything_but_empty() {
    assert_eq!(classify("rm 文件"), CommandCategory::ContainsForeignScript);
    assert_eq!(classify("clear 一"), CommandCategory::ContainsForeignScript);
    assert_eq!(classify("   "), CommandCategory::Empty);
}

#[test]
fn test_figure_defaults() {
    match classify("cowsay") {
        CommandCategory::AsciiArtRequest(request) => {
            assert_eq!(request.form, ArtForm::Figure);
            assert_eq!(request.style.as_deref(), Some(DEFAULT_FIGURE_STYLE));
            assert_eq!(request.text, DEFAULT_FIGURE_CAPTION);
        }
        other => panic!("unexpected category: {other:?}"),
    }
}

#[test]
fn test_figure_style_and_caption() {
    match classify("cowsay Dog Woof woof") {
        CommandCategory::AsciiArtRequest(request) => {
            assert_eq!(request.subtype, "cowsay");
            assert_eq!(request.style.as_deref(), Some("dog"));
            assert_eq!(request.text, "Woof woof");
        }
        other => panic!("unexpected category: {other:?}"),
    }
}

#[test]
fn test_art_prompt_carries_subtype_and_caption() {
    let line = mockshell::command::CommandLine::new("cowsay cat hi");
    let category = Classifier::default().classify_line(&line);
    let prompt = PromptBuilder::new().build(&category, &line).unwrap();
    assert!(prompt.user.contains("cat"));
    assert!(prompt.user.contains("hi"));
}

#[test]
fn test_unrecognized_keeps_original_case() {
    assert_eq!(
        classify("Xyz123 a b"),
        CommandCategory::Unrecognized {
            token: "Xyz123".to_string()
        }
    );
}

#[test]
fn test_custom_sets() {
    let mut sets = CommandSets::standard();
    sets.dangerous.insert("curl".to_string());
    let classifier = Classifier::new(sets);
    assert_eq!(
        classifier.classify("curl example.com"),
        CommandCategory::DangerousRejected
    );
}

proptest! {
    #[test]
    fn prop_classify_is_deterministic(raw in "\\PC{0,40}") {
        let classifier = Classifier::default();
        prop_assert_eq!(classifier.classify(&raw), classifier.classify(&raw));
    }

    #[test]
    fn prop_only_main_token_matters(token in "[a-z]{1,8}", args in "[a-z0-9 -]{0,20}") {
        let bare = classify(&token);
        let with_args = classify(&format!("{token} {args}"));
        let art = matches!(bare, CommandCategory::AsciiArtRequest(_));
        if !art {
            prop_assert_eq!(bare, with_args);
        }
    }

    #[test]
    fn prop_whitespace_only_is_empty(raw in "[ \\t\\n]{0,10}") {
        prop_assert_eq!(classify(&raw), CommandCategory::Empty);
    }

    #[test]
    fn prop_surrounding_whitespace_is_ignored(token in "[a-z]{1,8}") {
        prop_assert_eq!(classify(&token), classify(&format!("  {token}\t")));
    }
}
