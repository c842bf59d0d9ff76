//! Config-driven generation through to the written JSON file

use crate::common::*;
use go2type::{generate_from_config, Go2TypeConfig, Logger};
use serde_json::Value;
use std::fs;

const CONFIG: &str = r#"
auth_token: auth_token
auth_token_storage: sessionStorage
hooks: react-query
packages:
  - path: ./api
    output_path: ./frontend/src/api.generated.json
    type_mappings:
      otherpkg.OtherPkgType: string
  - path: ./missing
    output_path: ./frontend/src/missing.generated.json
"#;

fn setup() -> TestProject {
    let project = TestProject::new();
    project.write_file("go2type.yaml", CONFIG);
    project.write_file(
        "api/user.go",
        r#"package api

import "github.com/acme/otherpkg"

type User struct {
    ID   int                   `json:"id"`
    Info otherpkg.OtherPkgType `json:"info"`
    Tags []string              `json:"tags,omitempty"`
}

// @Method GET
// @Path /users/:id
// @Output User
// @Header sessionStorage:Authorization:auth_token
func GetUserHandler() {}
"#,
    );
    project
}

#[test]
fn test_generate_writes_json_and_reports_failures() {
    let project = setup();
    let config = Go2TypeConfig::from_file(project.root().join("go2type.yaml")).unwrap();

    let report = generate_from_config(&config, &Logger::new(false, false));

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.ends_with("missing"));
    assert_eq!(report.diagnostics, 0);
    assert!(!project.dir("frontend/src/missing.generated.json").exists());

    let written = fs::read_to_string(project.dir("frontend/src/api.generated.json")).unwrap();
    let doc: Value = serde_json::from_str(&written).unwrap();

    assert_eq!(doc["generator"], "go2type");
    assert_eq!(doc["options"]["authToken"], "auth_token");
    assert_eq!(doc["options"]["authTokenStorage"], "sessionStorage");
    assert_eq!(doc["options"]["hooks"], "react-query");
    assert_eq!(doc["importPath"], "example.com/app/api");

    let user = &doc["usedTypes"][0];
    assert_eq!(user["name"], "User");
    assert_eq!(user["fields"][1]["resolvedType"], "string");
    assert_eq!(user["fields"][2]["resolvedType"], "Array<string>");
    assert_eq!(user["fields"][2]["omitEmpty"], true);

    let handler = &doc["handlers"][0];
    assert_eq!(handler["name"], "GetUser");
    assert_eq!(handler["urlParams"][0], "id");
    assert_eq!(handler["headers"][0]["source"], "sessionStorage");
}

#[test]
fn test_field_errors_are_counted_not_fatal() {
    let project = setup();
    let mut config = Go2TypeConfig::from_file(project.root().join("go2type.yaml")).unwrap();
    config.packages.truncate(1);
    config.packages[0].type_mappings.clear();

    let report = generate_from_config(&config, &Logger::new(false, false));

    assert!(report.is_success());
    assert_eq!(report.diagnostics, 1);

    let written = fs::read_to_string(project.dir("frontend/src/api.generated.json")).unwrap();
    let doc: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["usedTypes"][0]["fields"][1]["resolvedType"], Value::Null);
    assert_eq!(doc["diagnostics"][0]["field"], "Info");
}
