//! End-to-end pipeline tests
//!
//! Runs TypeScript sources through extraction, graph building, scope
//! filtering, analysis, layout and diffing.

use classgraph::export::{diagram_from_json, export_json};
use classgraph::{
    DiagramPipeline, InclusionReason, LayoutOptions, NodeKind, PipelineConfig, PipelineError,
    RelationshipType, Scope,
};
use classgraph_parser_api::{ExtractorRegistry, SourceFile};
use classgraph_typescript::TypeScriptExtractor;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const PERSON: &str = r#"
export class Person {
    name: string;
    age: number;
}
"#;

const EMPLOYEE: &str = r#"
import { Person } from './Person';

export class Employee extends Person {
    employeeId: string;
}
"#;

const MANAGER: &str = r#"
import { Person } from './Person';

export class Manager {
    reports: number;
    title(): string { return "manager"; }
}
"#;

fn pipeline() -> DiagramPipeline {
    let registry = ExtractorRegistry::new().with(Arc::new(TypeScriptExtractor::new()));
    DiagramPipeline::new(registry)
}

fn file(id: &str, content: &str) -> SourceFile {
    SourceFile::new(id, format!("src/{id}.ts"), content)
}

fn names(output: &classgraph::DiagramOutput) -> Vec<String> {
    let mut names: Vec<String> = output
        .diagram
        .nodes
        .iter()
        .map(|n| n.display.name.clone())
        .collect();
    names.sort();
    names
}

#[test]
fn test_employee_file_scope_pulls_in_parent() {
    let files = vec![file("Person", PERSON), file("Employee", EMPLOYEE)];
    let output = pipeline().run(&files, &Scope::file("Employee"));

    assert_eq!(names(&output), vec!["Employee", "Person"]);
    assert_eq!(output.relationships.len(), 1);

    let edge = &output.diagram.edges[0];
    assert_eq!(edge.kind, RelationshipType::Inheritance);
    assert_eq!(edge.source, "Employee::Employee");
    assert_eq!(edge.target, "Person::Person");

    assert_eq!(output.filtered.reason("Employee"), Some(&InclusionReason::Local));
    assert_eq!(
        output.filtered.reason("Person"),
        Some(&InclusionReason::Imported {
            importing_file_id: "Employee".to_string(),
            has_relationship: true,
        })
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_unreferenced_import_is_excluded() {
    let files = vec![file("Person", PERSON), file("Manager", MANAGER)];
    let output = pipeline().run(&files, &Scope::file("Manager"));

    assert_eq!(names(&output), vec!["Manager"]);
    assert!(output.relationships.is_empty());
    assert!(output.diagram.edges.is_empty());

    // The import itself is still in the graph
    let manager = output.graph.get("Manager").unwrap();
    assert!(manager.imported_file_ids.contains("Person"));
}

#[test]
fn test_collection_property_is_aggregation() {
    let employee = "export class Employee { id: string; }";
    let team = r#"
import { Employee } from './Employee';
export class Team { members: Employee[]; }
"#;
    let output = pipeline().run(
        &[file("Employee", employee), file("Team", team)],
        &Scope::Project,
    );

    assert_eq!(output.relationships.len(), 1);
    assert_eq!(output.relationships[0].kind, RelationshipType::Aggregation);
    assert_eq!(output.relationships[0].source_id, "Team::Team");
    assert_eq!(output.relationships[0].target_id, "Employee::Employee");
}

#[test]
fn test_single_property_is_association() {
    let employee = "export class Employee { id: string; }";
    let desk = "export class Desk { owner: Employee; }";
    let output = pipeline().run(
        &[file("Employee", employee), file("Desk", desk)],
        &Scope::Project,
    );

    assert_eq!(output.relationships.len(), 1);
    assert_eq!(output.relationships[0].kind, RelationshipType::Association);
}

#[test]
fn test_project_scope_tags_every_entity() {
    let files = vec![
        file("Person", PERSON),
        file("Employee", EMPLOYEE),
        file("Manager", MANAGER),
    ];
    let output = pipeline().run(&files, &Scope::Project);

    assert_eq!(output.filtered.len(), 3);
    assert_eq!(output.filtered.total_before_filter, 3);
    assert!(output
        .filtered
        .inclusion_reasons
        .values()
        .all(|r| *r == InclusionReason::ProjectView));
}

#[test]
fn test_syntax_error_isolated_to_file() {
    let files = vec![
        file("Person", PERSON),
        file("Broken", "export class Broken { name: string"),
    ];
    let output = pipeline().run(&files, &Scope::Project);

    assert_eq!(names(&output), vec!["Person"]);
    let errors = output.errors.get("Broken").unwrap();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.line >= 1));
    assert!(!output.errors.contains_key("Person"));
}

#[test]
fn test_unregistered_files_are_skipped() {
    let files = vec![
        file("Person", PERSON),
        SourceFile::new("notes", "docs/notes.md", "# class Fake {}"),
    ];
    let output = pipeline().run(&files, &Scope::Project);

    assert_eq!(names(&output), vec!["Person"]);
    assert!(output.errors.is_empty());
}

#[test]
fn test_interface_realization_and_layout() {
    let shape = "export interface Shape { area(): number; }";
    let circle = r#"
import { Shape } from './Shape';
export class Circle implements Shape {
    radius: number;
    area(): number { return 3.14 * this.radius * this.radius; }
}
"#;
    let output = pipeline().run(
        &[file("Shape", shape), file("Circle", circle)],
        &Scope::file("Circle"),
    );

    let diagram = &output.diagram;
    assert_eq!(diagram.edges.len(), 1);
    assert_eq!(diagram.edges[0].kind, RelationshipType::Realization);

    let shape_node = diagram.node("Shape::Shape").unwrap();
    let circle_node = diagram.node("Circle::Circle").unwrap();
    assert_eq!(shape_node.kind, NodeKind::Interface);
    assert_eq!(shape_node.display.stereotype.as_deref(), Some("«interface»"));

    // Edges point down the ranks in the file-scope preset
    assert_eq!(circle_node.position.y, 0.0);
    assert_eq!(shape_node.position.y, circle_node.height + 80.0);

    let (min, _) = diagram.bounds().unwrap();
    assert_eq!((min.x, min.y), (0.0, 0.0));
}

#[test]
fn test_project_scope_uses_loose_preset() {
    let files = vec![file("Person", PERSON), file("Employee", EMPLOYEE)];

    let project = pipeline().run(&files, &Scope::Project);
    let employee = project.diagram.node("Employee::Employee").unwrap();
    let person = project.diagram.node("Person::Person").unwrap();
    assert_eq!(person.position.y - employee.height, 120.0);

    let config = PipelineConfig::default().with_layout(LayoutOptions::file_scope());
    let registry = ExtractorRegistry::new().with(Arc::new(TypeScriptExtractor::new()));
    let overridden = DiagramPipeline::with_config(registry, config).run(&files, &Scope::Project);
    let employee = overridden.diagram.node("Employee::Employee").unwrap();
    let person = overridden.diagram.node("Person::Person").unwrap();
    assert_eq!(person.position.y - employee.height, 80.0);
}

#[test]
fn test_parallel_graph_matches_sequential() {
    let files = vec![
        file("Person", PERSON),
        file("Employee", EMPLOYEE),
        file("Manager", MANAGER),
    ];
    let registry = ExtractorRegistry::new().with(Arc::new(TypeScriptExtractor::new()));
    let parallel = DiagramPipeline::with_config(registry, PipelineConfig::default().parallel());

    let sequential = pipeline().run(&files, &Scope::file("Employee"));
    let threaded = parallel.run(&files, &Scope::file("Employee"));

    assert_eq!(sequential.graph, threaded.graph);
    assert_eq!(sequential.diagram, threaded.diagram);
}

#[test]
fn test_update_without_changes_is_stable() {
    let files = vec![file("Person", PERSON), file("Employee", EMPLOYEE)];
    let pipeline = pipeline();
    let first = pipeline.run(&files, &Scope::Project);

    let update = pipeline.update(&files, &Scope::Project, &first.diagram);
    assert!(!update.diff.has_significant_changes());
    assert!(update.diff.nodes_added.is_empty());
    assert!(update.diff.nodes_removed.is_empty());
    assert!(update.diff.nodes_modified.is_empty());
    assert_eq!(update.output.diagram, first.diagram);
}

#[test]
fn test_update_keeps_positions_of_untouched_nodes() {
    let pipeline = pipeline();
    let before = vec![file("Person", PERSON), file("Employee", EMPLOYEE)];
    let first = pipeline.run(&before, &Scope::Project);

    let edited = r#"
import { Person } from './Person';

export class Employee extends Person {
    employeeId: string;
    department: string;
    hiredOn: Date;
}
"#;
    let after = vec![file("Person", PERSON), file("Employee", edited)];
    let update = pipeline.update(&after, &Scope::Project, &first.diagram);

    let diff = &update.diff;
    assert!(diff.has_significant_changes());
    assert_eq!(diff.nodes_modified.len(), 1);
    assert_eq!(diff.nodes_modified[0].id, "Employee::Employee");
    assert_eq!(diff.nodes_unchanged.len(), 1);
    assert_eq!(diff.edges_unchanged.len(), 1);

    let old_person = first.diagram.node("Person::Person").unwrap();
    let new_person = update.output.diagram.node("Person::Person").unwrap();
    assert_eq!(new_person.position, old_person.position);
}

#[test]
fn test_update_reports_added_and_removed() {
    let pipeline = pipeline();
    let first = pipeline.run(&[file("Person", PERSON)], &Scope::Project);

    let update = pipeline.update(&[file("Manager", MANAGER)], &Scope::Project, &first.diagram);
    assert_eq!(update.diff.nodes_added.len(), 1);
    assert_eq!(update.diff.nodes_added[0].display.name, "Manager");
    assert_eq!(update.diff.nodes_removed.len(), 1);
    assert_eq!(update.diff.nodes_removed[0].display.name, "Person");
}

#[test]
fn test_json_export_of_pipeline_output() {
    let files = vec![file("Person", PERSON), file("Employee", EMPLOYEE)];
    let output = pipeline().run(&files, &Scope::Project);

    let json = export_json(&output.diagram).unwrap();
    let restored = diagram_from_json(&json).unwrap();
    assert_eq!(restored, output.diagram);
}

#[test]
fn test_load_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src/models")).unwrap();
    fs::create_dir_all(root.join("node_modules/lib")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();

    fs::write(root.join("src/models/Person.ts"), PERSON).unwrap();
    fs::write(
        root.join("src/Employee.ts"),
        EMPLOYEE.replace("./Person", "./models/Person"),
    )
    .unwrap();
    fs::write(root.join("README.md"), "# project").unwrap();
    fs::write(root.join("node_modules/lib/index.ts"), "export class Lib {}").unwrap();
    fs::write(root.join(".cache/Stale.ts"), "export class Stale {}").unwrap();

    let pipeline = pipeline();
    let files = pipeline.load_directory(root).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/Employee.ts", "src/models/Person.ts"]);
    assert_eq!(files[0].id, "src/Employee.ts");

    let output = pipeline.run(&files, &Scope::file("src/Employee.ts"));
    assert_eq!(names(&output), vec!["Employee", "Person"]);
    assert_eq!(output.diagram.edges.len(), 1);
}

#[test]
fn test_load_missing_directory_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist");

    let err = pipeline().load_directory(&missing).unwrap_err();
    match err {
        PipelineError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_directory_walks_hidden_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join(".workspace");
    fs::create_dir_all(root.join("src/dist")).unwrap();
    fs::create_dir_all(root.join("src/target")).unwrap();

    fs::write(root.join("src/Person.ts"), PERSON).unwrap();
    fs::write(root.join("src/dist/Person.ts"), PERSON).unwrap();
    fs::write(root.join("src/target/Person.ts"), PERSON).unwrap();

    let files = pipeline().load_directory(&root).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/Person.ts"]);
}
