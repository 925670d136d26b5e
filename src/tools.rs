// SPDX-License-Identifier: MIT

//! Tool functions exposed to the model
//!
//! The two filesystem operations are described to Gemini as function
//! declarations; `dispatch` maps a returned function call back onto the
//! Rust implementations.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{OrdoError, Result};
use crate::finder::find_files;
use crate::organizer::organize_files;

/// A function declaration in the Gemini tools schema.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The tool declarations sent with every chat request.
pub fn declarations(config: &AppConfig) -> Vec<FunctionDeclaration> {
    vec![
        FunctionDeclaration {
            name: "find_files".to_string(),
            description: format!(
                "Finds all files with a specific extension in a given directory and its \
                 subdirectories. Returns up to {} absolute paths.",
                config.search.max_results
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "file_extension": {
                        "type": "string",
                        "description": "The extension to look for (e.g. 'pdf', 'txt'). \
                                        Case insensitive. Do not include the dot."
                    },
                    "search_path": {
                        "type": "string",
                        "description": format!(
                            "The root directory to start the search from. Defaults to {}. \
                             Full-volume scans can be slow.",
                            config.search.default_root
                        )
                    }
                },
                "required": ["file_extension"]
            }),
        },
        FunctionDeclaration {
            name: "organize_files".to_string(),
            description: "Moves all files of a certain extension from a source path \
                          (recursive) into a single target folder created inside the \
                          source path. Returns a status message."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "file_extension": {
                        "type": "string",
                        "description": "The extension of files to move (e.g. 'pdf')."
                    },
                    "source_path": {
                        "type": "string",
                        "description": "Where to look for files to move."
                    },
                    "target_folder_name": {
                        "type": "string",
                        "description": "Name of the folder to put files into, created \
                                        inside the source path."
                    }
                },
                "required": ["file_extension", "source_path", "target_folder_name"]
            }),
        },
    ]
}

fn required_str<'a>(args: &'a Value, key: &str, tool: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| OrdoError::Tool(format!("{}: missing argument '{}'", tool, key)))
}

/// Execute a function call returned by the model.
///
/// The result is always a JSON object, as the functionResponse protocol
/// requires.
pub fn dispatch(name: &str, args: &Value, config: &AppConfig) -> Result<Value> {
    debug!("Dispatching tool call: {}({})", name, args);

    match name {
        "find_files" => {
            let extension = required_str(args, "file_extension", name)?;
            let search_path = args
                .get("search_path")
                .and_then(|v| v.as_str())
                .unwrap_or(&config.search.default_root);
            let files = find_files(extension, search_path, config.search.max_results);
            Ok(json!({ "files": files }))
        }
        "organize_files" => {
            let extension = required_str(args, "file_extension", name)?;
            let source_path = required_str(args, "source_path", name)?;
            let target_folder_name = required_str(args, "target_folder_name", name)?;
            let status = organize_files(
                extension,
                source_path,
                target_folder_name,
                config.search.max_results,
            );
            Ok(json!({ "status": status }))
        }
        other => Err(OrdoError::Tool(format!("unknown tool: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_cover_both_tools() {
        let config = AppConfig::default();
        let decls = declarations(&config);
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["find_files", "organize_files"]);
        for decl in &decls {
            assert_eq!(decl.parameters["type"], "object");
            assert!(decl.parameters["required"].is_array());
        }
    }

    #[test]
    fn test_dispatch_find_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();

        let config = AppConfig::default();
        let args = json!({
            "file_extension": "txt",
            "search_path": dir.path().to_str().unwrap(),
        });

        let result = dispatch("find_files", &args, &config).unwrap();
        let files = result["files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].as_str().unwrap().ends_with("a.txt"));
    }

    #[test]
    fn test_dispatch_organize_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();

        let config = AppConfig::default();
        let args = json!({
            "file_extension": "txt",
            "source_path": dir.path().to_str().unwrap(),
            "target_folder_name": "Archive",
        });

        let result = dispatch("organize_files", &args, &config).unwrap();
        let status = result["status"].as_str().unwrap();
        assert!(status.starts_with("Successfully moved 1 files"));
        assert!(dir.path().join("Archive/a.txt").exists());
    }

    #[test]
    fn test_dispatch_missing_argument() {
        let config = AppConfig::default();
        let err = dispatch("find_files", &json!({}), &config).unwrap_err();
        assert!(err.to_string().contains("file_extension"));
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let config = AppConfig::default();
        let err = dispatch("delete_everything", &json!({}), &config).unwrap_err();
        assert!(err.to_string().contains("unknown tool"));
    }
}
