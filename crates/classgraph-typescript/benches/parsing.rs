// TypeScript extractor performance benchmarks
use classgraph_parser_api::SourceFile;
use classgraph_typescript::{Extractor, TypeScriptExtractor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const USER_CLASS: &str = r#"
export class User {
    private id: string;
    public name: string;
    protected email: string;

    constructor(id: string, name: string, email: string) {
        this.id = id;
        this.name = name;
        this.email = email;
    }

    public getId(): string {
        return this.id;
    }

    public async save(): Promise<void> {
        await database.save(this);
    }

    private validate(): boolean {
        return this.email.includes('@');
    }
}
"#;

fn bench_extract_class_with_methods(c: &mut Criterion) {
    let extractor = TypeScriptExtractor::new();

    c.bench_function("extract_class_with_methods", |b| {
        b.iter(|| extractor.extract(black_box(USER_CLASS), "User"));
    });
}

fn bench_extract_heritage_and_interfaces(c: &mut Criterion) {
    let source = r#"
import { Entity } from './Entity';
import type { Auditable, Versioned } from './traits';

interface Repository<T> extends Reader<T>, Writer<T> {
    findAll(): T[];
    findById(id: string): T | undefined;
}

export abstract class Document extends Entity implements Auditable, Versioned {
    readonly createdAt: Date;
    revisions: Revision[] = [];
    protected owner?: User;

    abstract render(format: string): string;

    get latest(): Revision | null {
        return this.revisions[this.revisions.length - 1] ?? null;
    }
}
"#;
    let extractor = TypeScriptExtractor::new();

    c.bench_function("extract_heritage_and_interfaces", |b| {
        b.iter(|| extractor.extract(black_box(source), "Document"));
    });
}

fn bench_parse_imports(c: &mut Criterion) {
    let source = r#"
import React, { useState, useEffect } from 'react';
import { Button } from './components/Button';
import type { UserProfile } from './types';
import * as api from '../api';
export { Card } from './components/Card';
"#;
    let extractor = TypeScriptExtractor::new();

    c.bench_function("parse_imports", |b| {
        b.iter(|| extractor.parse_imports(black_box(source), "src/App.tsx"));
    });
}

fn bench_extract_all_parallel(c: &mut Criterion) {
    let files: Vec<SourceFile> = (0..64)
        .map(|i| SourceFile::new(format!("user{i}"), format!("src/user{i}.ts"), USER_CLASS))
        .collect();
    let extractor = TypeScriptExtractor::new();

    c.bench_function("extract_all_64_files", |b| {
        b.iter(|| extractor.extract_all(black_box(&files)));
    });
}

criterion_group!(
    benches,
    bench_extract_class_with_methods,
    bench_extract_heritage_and_interfaces,
    bench_parse_imports,
    bench_extract_all_parallel
);
criterion_main!(benches);
