//! Heuristic documentation scanner for script source.
//!
//! Line-oriented and state-free: each line is matched against fixed marker
//! substrings in priority order. `#VAR` and `#FUNC` markers bind to the
//! immediately following line; a marker whose next line is not the expected
//! construct is a fatal parse failure for the whole file.

use std::path::Path;

use crate::error::{DocsError, Result};
use crate::model::script_class::{ExportCategory, Function, ScriptClass, Variable};

/// Extract the documentation model from one script's source text.
pub fn parse_script(source: &str, path: &Path) -> Result<ScriptClass> {
    let mut class = ScriptClass::default();
    let mut lines = source.lines();

    while let Some(raw) = lines.next() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("extends ") {
            class.parent = rest.trim().to_string();
            continue;
        }

        if let Some(rest) = line.strip_prefix("#CLASS") {
            class.short_desc = rest.trim().to_string();
            continue;
        }

        if let Some(rest) = line.strip_prefix("class_name ") {
            class.name = rest.trim().to_string();
            class.is_public = true;
            continue;
        }

        if let Some(rest) = line.strip_prefix("#TAGS") {
            class.tags = rest
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            continue;
        }

        if line.starts_with("@export_category") {
            class.categories.push(ExportCategory {
                name: extract_category_name(line),
                variables: Vec::new(),
            });
            continue;
        }

        if let Some(rest) = line.strip_prefix("#VAR") {
            let desc = rest.trim().to_string();
            let next = lines.next().unwrap_or("");
            if !next.contains("@export var") {
                return Err(DocsError::Script {
                    path: path.to_path_buf(),
                    message: "#VAR marker not followed by an exported variable".to_string(),
                    help: Some("the line after #VAR must contain `@export var`".to_string()),
                });
            }
            let mut variable = extract_variable(next.trim());
            variable.short_desc = desc;
            current_category(&mut class.categories).variables.push(variable);
            continue;
        }

        if line.starts_with("@export var") {
            let variable = extract_variable(line);
            current_category(&mut class.categories).variables.push(variable);
            continue;
        }

        if let Some(rest) = line.strip_prefix("#FUNC") {
            let desc = rest.trim().to_string();
            let next = lines.next().unwrap_or("");
            if !next.trim_start().starts_with("func") {
                return Err(DocsError::Script {
                    path: path.to_path_buf(),
                    message: "#FUNC marker not followed by a function".to_string(),
                    help: Some("the line after #FUNC must begin with `func`".to_string()),
                });
            }
            let mut function = extract_function(next);
            function.short_desc = desc;
            class.functions.push(function);
            continue;
        }

        if line.starts_with("func") {
            class.functions.push(extract_function(line));
        }
    }

    Ok(class)
}

/// The category new variables accumulate into: the last one opened, or an
/// implicit unnamed default.
fn current_category(categories: &mut Vec<ExportCategory>) -> &mut ExportCategory {
    if categories.is_empty() {
        categories.push(ExportCategory::default());
    }
    let last = categories.len() - 1;
    &mut categories[last]
}

fn extract_category_name(line: &str) -> String {
    match (line.find('"'), line.rfind('"')) {
        (Some(start), Some(end)) if end > start => line[start + 1..end].to_string(),
        _ => String::new(),
    }
}

/// Parse `@export var name: type = default`. Name is everything between the
/// `var` keyword and `:`/`=`; type is everything between `:` and `=`.
fn extract_variable(line: &str) -> Variable {
    let rest = line
        .strip_prefix("@export var")
        .map(str::trim_start)
        .unwrap_or(line);

    let name_end = rest.find([':', '=']).unwrap_or(rest.len());
    let name = rest[..name_end].trim().to_string();

    let var_type = if rest[name_end..].starts_with(':') {
        let after = &rest[name_end + 1..];
        let type_end = after.find('=').unwrap_or(after.len());
        after[..type_end].trim().to_string()
    } else {
        String::new()
    };

    Variable {
        name,
        var_type,
        short_desc: String::new(),
    }
}

/// Parse `func name(arg: Type, ...) -> Ret:`. Arguments split on commas,
/// each on `:` into a name/type pair; return type defaults to `"void"`.
fn extract_function(line: &str) -> Function {
    let rest = line
        .trim_start()
        .strip_prefix("func")
        .map(str::trim_start)
        .unwrap_or(line);

    let name_end = rest.find('(').unwrap_or(rest.len());
    let name = rest[..name_end].trim().to_string();

    let mut arguments = Vec::new();
    let mut after_args = "";
    if name_end < rest.len() {
        let args_src = &rest[name_end + 1..];
        let close = args_src.find(')').unwrap_or(args_src.len());
        for arg in args_src[..close].split(',') {
            let arg = arg.trim();
            if arg.is_empty() {
                continue;
            }
            let variable = match arg.split_once(':') {
                Some((arg_name, arg_type)) => {
                    let arg_type = arg_type.split('=').next().unwrap_or("").trim();
                    Variable {
                        name: arg_name.trim().to_string(),
                        var_type: arg_type.to_string(),
                        short_desc: String::new(),
                    }
                }
                None => Variable {
                    name: arg.split('=').next().unwrap_or(arg).trim().to_string(),
                    var_type: String::new(),
                    short_desc: String::new(),
                },
            };
            arguments.push(variable);
        }
        if close < args_src.len() {
            after_args = &args_src[close + 1..];
        }
    }

    let return_type = after_args
        .find("->")
        .map(|i| {
            let after = &after_args[i + 2..];
            let end = after.find(':').unwrap_or(after.len());
            after[..end].trim().to_string()
        })
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "void".to_string());

    Function {
        name,
        short_desc: String::new(),
        arguments,
        return_type,
    }
}
