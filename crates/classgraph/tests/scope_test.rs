//! Scope filter integration tests
//!
//! Builds dependency graphs from TypeScript sources and synthetic projects and
//! checks file-scope inclusion, import cycles and latency.

use classgraph::graph::{collect_related_entities, DependencyGraph, DependencyNode};
use classgraph::{analyze_entities, filter_by_scope, InclusionReason, Scope};
use classgraph_parser_api::{
    EntitiesByFile, ExtractorRegistry, ImportInfo, Property, SourceFile, TypeEntity,
};
use classgraph_typescript::{Extractor, TypeScriptExtractor};
use std::collections::HashSet;
use std::sync::Arc;

fn extract_project(files: &[SourceFile]) -> (EntitiesByFile, DependencyGraph) {
    let extractor = Arc::new(TypeScriptExtractor::new());
    let registry = ExtractorRegistry::new().with(extractor.clone());

    let mut entities = EntitiesByFile::new();
    for file in files {
        entities.insert(file.id.clone(), extractor.extract_file(file).entities);
    }
    let graph = DependencyGraph::build(files, &entities, &registry);
    (entities, graph)
}

#[test]
fn test_mutual_import_cycle() {
    let files = vec![
        SourceFile::new(
            "a",
            "src/a.ts",
            "import { B } from './b';\nexport class A { partner: B; }",
        ),
        SourceFile::new(
            "b",
            "src/b.ts",
            "import { A } from './a';\nexport class B { partner: A; }",
        ),
    ];
    let (entities, graph) = extract_project(&files);
    assert_eq!(graph.cycles(), vec![vec!["a".to_string(), "b".to_string()]]);

    let related: Vec<&str> = collect_related_entities("a", &graph, 5)
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(related, vec!["A", "B"]);

    let filtered = filter_by_scope(&entities, &Scope::file("a"), Some(&graph));
    assert_eq!(filtered.len(), 2);

    let relationships = analyze_entities(&filtered.entities);
    let ids: HashSet<&str> = relationships.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids.len(), relationships.len());
    assert_eq!(relationships.len(), 2);
}

#[test]
fn test_transitive_chain_through_imports() {
    let files = vec![
        SourceFile::new("address", "src/address.ts", "export class Address { city: string; }"),
        SourceFile::new(
            "person",
            "src/person.ts",
            "import { Address } from './address';\nexport class Person { home: Address; }",
        ),
        SourceFile::new(
            "employee",
            "src/employee.ts",
            "import { Person } from './person';\nexport class Employee extends Person {}",
        ),
        SourceFile::new("unrelated", "src/unrelated.ts", "export class Unrelated {}"),
    ];
    let (entities, graph) = extract_project(&files);

    let filtered = filter_by_scope(&entities, &Scope::file("employee"), Some(&graph));
    let mut names: Vec<&str> = filtered.entities.iter().map(|e| e.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Address", "Employee", "Person"]);

    assert_eq!(
        filtered.reason("Address"),
        Some(&InclusionReason::Transitive {
            importing_file_id: "person".to_string(),
            via: "Person".to_string(),
        })
    );
}

#[test]
fn test_barrel_reexport_links_files() {
    let files = vec![
        SourceFile::new("person", "src/models/person.ts", "export class Person {}"),
        SourceFile::new("index", "src/models/index.ts", "export * from './person';"),
        SourceFile::new(
            "employee",
            "src/employee.ts",
            "import { Person } from './models';\nexport class Employee extends Person {}",
        ),
    ];
    let (entities, graph) = extract_project(&files);

    let employee = graph.get("employee").unwrap();
    assert!(employee.imported_file_ids.contains("index"));

    let filtered = filter_by_scope(&entities, &Scope::file("employee"), Some(&graph));
    assert_eq!(filtered.len(), 2);
}

/// `count` files in an import chain; each class holds the next one
fn chain_project(count: usize) -> (EntitiesByFile, DependencyGraph) {
    let mut entities = EntitiesByFile::new();
    let mut graph = DependencyGraph::new();

    for i in 0..count {
        let id = format!("f{i}");
        let mut class = TypeEntity::class(format!("C{i}"), id.clone());
        let mut imports = Vec::new();
        if i + 1 < count {
            class = class.with_properties(vec![
                Property::new("next").with_type(format!("C{}", i + 1)),
                Property::new("label").with_type("string"),
            ]);
            let mut import = ImportInfo::new(format!("./f{}", i + 1), 1);
            import.resolved_file_id = Some(format!("f{}", i + 1));
            imports.push(import);
        }
        let noise = TypeEntity::class(format!("Noise{i}"), id.clone());

        let node = DependencyNode::new(id.clone(), format!("src/{id}.ts"))
            .with_imports(imports)
            .with_entities(vec![class.clone(), noise.clone()]);
        graph.insert(node);
        entities.insert(id, vec![class, noise]);
    }

    (entities, graph)
}

#[test]
fn test_project_mode_returns_all_entities() {
    let (entities, graph) = chain_project(40);
    let filtered = filter_by_scope(&entities, &Scope::Project, Some(&graph));

    assert_eq!(filtered.len(), 80);
    assert!(filtered
        .inclusion_reasons
        .values()
        .all(|r| r.name() == "project-view"));
}

#[test]
fn test_file_scope_latency_dozens_of_entities() {
    let (entities, graph) = chain_project(20);
    let filtered = filter_by_scope(&entities, &Scope::file("f0"), Some(&graph));

    // Local file plus five hops of the chain; noise classes are unrelated
    assert_eq!(filtered.len(), 7);
    assert!(
        filtered.filter_time_ms < 50.0,
        "filter took {}ms",
        filtered.filter_time_ms
    );
}

#[test]
fn test_file_scope_latency_hundred_files() {
    let (entities, graph) = chain_project(100);

    let filtered = filter_by_scope(&entities, &Scope::file("f0"), Some(&graph));
    assert!(
        filtered.filter_time_ms < 100.0,
        "filter took {}ms",
        filtered.filter_time_ms
    );

    let project = filter_by_scope(&entities, &Scope::Project, Some(&graph));
    assert_eq!(project.len(), 200);
    assert!(project.filter_time_ms < 100.0);
}
