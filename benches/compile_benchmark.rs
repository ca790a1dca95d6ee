use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use csp_forge::{
    compile, compile_with_nonce, rewrite_script_tags, CspEngine, DirectiveFlag, DirectiveName,
    DirectiveSpec, NonceGenerator, Policy, PolicyVersion, SandboxToken, TransformRegistry,
};

fn simple_policy() -> Policy {
    Policy::builder()
        .directive(
            DirectiveName::DefaultSrc,
            DirectiveSpec::new().allow(DirectiveFlag::Self_),
        )
        .directive(
            DirectiveName::ScriptSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .allow(DirectiveFlag::UnsafeInline),
        )
        .build()
}

fn complex_policy() -> Policy {
    Policy::builder()
        .https_only(true)
        .trusted_types(true)
        .enable_nonces(true)
        .base_uri("'self'")
        .sandbox(SandboxToken::AllowScripts)
        .form_action("'self'")
        .frame_ancestors("'none'")
        .report_to(r#"{"group":"csp-endpoint","max_age":10886400}"#)
        .net_error(r#"{"report_to":"csp-endpoint","max_age":10886400}"#)
        .directive(
            DirectiveName::DefaultSrc,
            DirectiveSpec::new().allow(DirectiveFlag::Self_),
        )
        .directive(
            DirectiveName::ScriptSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .allow(DirectiveFlag::StrictDynamic)
                .domains("https://cdn.example.org https://static.example.org"),
        )
        .directive(
            DirectiveName::StyleSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .allow(DirectiveFlag::UnsafeInline)
                .domains("https://fonts.googleapis.com"),
        )
        .directive(
            DirectiveName::ImgSrc,
            DirectiveSpec::new().allow(DirectiveFlag::Self_).domains("data:"),
        )
        .directive(
            DirectiveName::ConnectSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .domains("https://api.example.org"),
        )
        .directive(
            DirectiveName::FontSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .domains("https://fonts.gstatic.com"),
        )
        .directive(DirectiveName::ObjectSrc, DirectiveSpec::new().none(true))
        .directive(DirectiveName::FrameSrc, DirectiveSpec::new().none(true))
        .build()
}

fn benchmark_policy_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_creation");

    group.bench_function("simple_policy", |b| b.iter(|| black_box(simple_policy())));

    group.bench_function("complex_policy", |b| b.iter(|| black_box(complex_policy())));

    group.finish();
}

fn benchmark_header_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_compilation");

    let registry = TransformRegistry::new();
    let simple = simple_policy();
    let complex = complex_policy();

    group.bench_function("simple_header", |b| {
        b.iter(|| black_box(compile(black_box(&simple), &registry).materialize(None)))
    });

    group.bench_function("complex_header", |b| {
        b.iter(|| black_box(compile(black_box(&complex), &registry).materialize(None)))
    });

    group.bench_function("complex_header_with_nonce", |b| {
        b.iter(|| {
            black_box(compile_with_nonce(
                black_box(&complex),
                &registry,
                "5f4dcc3b5aa765d61d8327deb882cf99",
            ))
        })
    });

    group.finish();
}

fn benchmark_cached_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_compilation");

    let engine = CspEngine::new(complex_policy());
    let snapshot = engine.snapshot();
    engine.compiled(&snapshot);

    group.bench_function("cache_hit", |b| {
        b.iter(|| black_box(engine.compiled(&snapshot)))
    });

    group.bench_function("version_hash", |b| {
        let policy = complex_policy();
        b.iter(|| black_box(PolicyVersion::compute(black_box(&policy))))
    });

    group.finish();
}

fn benchmark_nonce_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonce_generation");

    let generator = NonceGenerator::new(16);
    let generator_32 = NonceGenerator::new(32);
    let generator_pooled = NonceGenerator::with_capacity(32, 16);

    group.bench_function("nonce_16", |b| b.iter(|| black_box(generator.generate())));

    group.bench_function("nonce_32", |b| {
        b.iter(|| black_box(generator_32.generate()))
    });

    group.bench_function("nonce_pooled", |b| {
        b.iter(|| black_box(generator_pooled.generate()))
    });

    group.finish();
}

fn benchmark_body_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_rewrite");

    let small = Bytes::from_static(
        b"<html><head><script src=\"/app.js\"></script></head><body></body></html>",
    );
    let large = Bytes::from(format!(
        "<html><head><script src=\"/app.js\"></script></head><body>{}<script defer src=\"/late.js\"></script></body></html>",
        "<p>filler paragraph</p>".repeat(400)
    ));

    group.bench_function("small_document", |b| {
        b.iter(|| {
            black_box(rewrite_script_tags(
                small.clone(),
                "5f4dcc3b5aa765d61d8327deb882cf99",
            ))
        })
    });

    group.bench_function("large_document", |b| {
        b.iter(|| {
            black_box(rewrite_script_tags(
                large.clone(),
                "5f4dcc3b5aa765d61d8327deb882cf99",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_policy_creation,
    benchmark_header_compilation,
    benchmark_cached_compilation,
    benchmark_nonce_generation,
    benchmark_body_rewrite
);
criterion_main!(benches);
