//! Build script for bikeshare-i18n crate
//!
//! Validates the bundled Fluent files at compile time: every file must
//! parse, every locale must define the same message keys, and each message
//! must take the same variables in every locale.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::process;

use fluent_syntax::ast::{Entry, Expression, InlineExpression, Pattern, PatternElement};
use fluent_syntax::parser::parse;

const LOCALES: [&str; 2] = ["en-US", "id-ID"];
const RESOURCE: &str = "dashboard.ftl";

type MessageParams = BTreeMap<String, BTreeSet<String>>;

fn collect_from_pattern(pattern: &Pattern<&str>, params: &mut BTreeSet<String>) {
    for element in &pattern.elements {
        if let PatternElement::Placeable { expression } = element {
            collect_from_expression(expression, params);
        }
    }
}

fn collect_from_expression(expression: &Expression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        Expression::Select { selector, variants } => {
            collect_from_inline(selector, params);
            for variant in variants {
                collect_from_pattern(&variant.value, params);
            }
        }
        Expression::Inline(inline) => collect_from_inline(inline, params),
    }
}

fn collect_from_inline(expression: &InlineExpression<&str>, params: &mut BTreeSet<String>) {
    match expression {
        InlineExpression::VariableReference { id } => {
            params.insert(id.name.to_string());
        }
        InlineExpression::FunctionReference { arguments, .. } => {
            for arg in &arguments.positional {
                collect_from_inline(arg, params);
            }
            for arg in &arguments.named {
                collect_from_inline(&arg.value, params);
            }
        }
        InlineExpression::Placeable { expression } => collect_from_expression(expression, params),
        InlineExpression::MessageReference { .. }
        | InlineExpression::TermReference { .. }
        | InlineExpression::StringLiteral { .. }
        | InlineExpression::NumberLiteral { .. } => {}
    }
}

fn validate_locale_file(path: &Path) -> Result<MessageParams, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let resource = parse(content.as_str())
        .map_err(|(_, errors)| format!("Parse errors in {}: {:?}", path.display(), errors))?;

    let mut messages = MessageParams::new();
    for entry in &resource.body {
        if let Entry::Message(message) = entry {
            let mut params = BTreeSet::new();
            if let Some(value) = &message.value {
                collect_from_pattern(value, &mut params);
            }
            for attribute in &message.attributes {
                collect_from_pattern(&attribute.value, &mut params);
            }
            messages.insert(message.id.name.to_string(), params);
        }
    }
    Ok(messages)
}

fn main() {
    let locales_dir = Path::new("locales");
    println!("cargo:rerun-if-changed=locales");

    let mut parsed = Vec::new();
    for locale in LOCALES {
        let path = locales_dir.join(locale).join(RESOURCE);
        println!("cargo:rerun-if-changed={}", path.display());
        match validate_locale_file(&path) {
            Ok(messages) => parsed.push((locale, messages)),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    }

    let Some((reference_locale, reference)) = parsed.first() else {
        return;
    };
    let mut failures = Vec::new();
    for (locale, messages) in &parsed[1..] {
        for key in reference.keys().filter(|k| !messages.contains_key(*k)) {
            failures.push(format!("{locale}: missing message '{key}'"));
        }
        for key in messages.keys().filter(|k| !reference.contains_key(*k)) {
            failures.push(format!("{locale}: message '{key}' not in {reference_locale}"));
        }
        for (key, params) in messages {
            if let Some(expected) = reference.get(key) {
                if expected != params {
                    failures.push(format!(
                        "{locale}: message '{key}' takes {params:?}, {reference_locale} takes {expected:?}"
                    ));
                }
            }
        }
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("error: {failure}");
        }
        process::exit(1);
    }
}
