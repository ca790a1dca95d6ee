use csp_forge::{
    compile, CspEngine, DirectiveFlag, DirectiveName, DirectiveSpec, HeaderCache, Policy,
    PolicyVersion, TransformRegistry,
};
use std::sync::Arc;
use std::time::Duration;

fn sample_policy() -> Policy {
    Policy::builder()
        .https_only(true)
        .directive(
            DirectiveName::DefaultSrc,
            DirectiveSpec::new().allow(DirectiveFlag::Self_),
        )
        .directive(
            DirectiveName::ScriptSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .domains("https://cdn.example.org"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_lookup_computes_then_hits() {
        let cache = HeaderCache::new(8, Duration::from_secs(60));
        let policy = sample_policy();
        let version = PolicyVersion::compute(&policy);
        let registry = TransformRegistry::new();

        let (first, hit) = cache.get_or_compute(&version, || compile(&policy, &registry));
        assert!(!hit);
        assert_eq!(cache.len(), 1);

        let (second, hit) = cache.get_or_compute(&version, || compile(&policy, &registry));
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_versions_get_distinct_entries() {
        let cache = HeaderCache::new(8, Duration::from_secs(60));
        let registry = TransformRegistry::new();
        let enforcing = sample_policy();
        let mut reporting = sample_policy();
        reporting.global_mut().report_only = true;

        let (a, _) = cache.get_or_compute(&PolicyVersion::compute(&enforcing), || {
            compile(&enforcing, &registry)
        });
        let (b, _) = cache.get_or_compute(&PolicyVersion::compute(&reporting), || {
            compile(&reporting, &registry)
        });
        assert_eq!(cache.len(), 2);
        assert_ne!(
            a.materialize(None)[0].value(),
            b.materialize(None)[0].value()
        );
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = HeaderCache::new(8, Duration::from_millis(10));
        let policy = sample_policy();
        let version = PolicyVersion::compute(&policy);
        let registry = TransformRegistry::new();

        cache.get_or_compute(&version, || compile(&policy, &registry));
        assert!(cache.get(&version).is_some());

        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.get(&version).is_none());
    }

    #[test]
    fn test_zero_ttl_disables_storage() {
        let cache = HeaderCache::new(8, Duration::ZERO);
        let policy = sample_policy();
        let version = PolicyVersion::compute(&policy);
        let registry = TransformRegistry::new();

        let (_, hit) = cache.get_or_compute(&version, || compile(&policy, &registry));
        assert!(!hit);
        let (_, hit) = cache.get_or_compute(&version, || compile(&policy, &registry));
        assert!(!hit);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_empty_header_sets_are_never_cached() {
        let cache = HeaderCache::default();
        let policy = Policy::new();
        let version = PolicyVersion::compute(&policy);
        let registry = TransformRegistry::new();

        let (headers, _) = cache.get_or_compute(&version, || compile(&policy, &registry));
        assert!(headers.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let cache = HeaderCache::new(0, Duration::from_secs(60));
        let policy = sample_policy();
        let version = PolicyVersion::compute(&policy);
        let registry = TransformRegistry::new();

        cache.get_or_compute(&version, || compile(&policy, &registry));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_drops_entries() {
        let cache = HeaderCache::default();
        let policy = sample_policy();
        let version = PolicyVersion::compute(&policy);
        let registry = TransformRegistry::new();

        cache.get_or_compute(&version, || compile(&policy, &registry));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&version).is_none());
    }

    #[test]
    fn test_cached_and_uncached_compilation_agree() {
        let cached = CspEngine::builder().policy(sample_policy()).build();
        let uncached = CspEngine::builder()
            .policy(sample_policy())
            .cache_ttl(Duration::ZERO)
            .build();

        let warm = cached.compiled(&cached.snapshot());
        let hot = cached.compiled(&cached.snapshot());
        let cold = uncached.compiled(&uncached.snapshot());

        let warm = warm.materialize(Some("abc123"));
        let hot = hot.materialize(Some("abc123"));
        let cold = cold.materialize(Some("abc123"));
        assert_eq!(warm[0].value(), cold[0].value());
        assert_eq!(hot[0].value(), cold[0].value());

        assert_eq!(cached.stats().cache_hit_count(), 1);
        assert_eq!(cached.stats().cache_miss_count(), 1);
        assert_eq!(uncached.stats().cache_hit_count(), 0);
        assert_eq!(uncached.stats().cache_miss_count(), 2);
    }

    #[test]
    fn test_install_swaps_policy_and_invalidates() {
        let engine = CspEngine::new(sample_policy());
        let before = engine.compiled(&engine.snapshot());
        assert_eq!(engine.cache().len(), 1);

        engine.install(
            Policy::builder()
                .directive(DirectiveName::DefaultSrc, DirectiveSpec::new().none(true))
                .build(),
        );
        assert!(engine.cache().is_empty());
        assert_eq!(engine.stats().policy_update_count(), 1);

        let after = engine.compiled(&engine.snapshot());
        assert_eq!(after.materialize(None)[0].value(), "default-src 'none'");
        assert_ne!(
            before.materialize(None)[0].value(),
            after.materialize(None)[0].value()
        );
    }

    #[test]
    fn test_update_policy_edits_in_place() {
        let engine = CspEngine::new(sample_policy());
        engine.update_policy(|policy| {
            policy.global_mut().report_only = true;
            policy.global_mut().report_uri = Some("https://csp.example.org/report".into());
        });

        let snapshot = engine.snapshot();
        assert!(snapshot.policy().global().report_only);
        assert!(snapshot
            .policy()
            .directive(DirectiveName::ScriptSrc)
            .is_some());
        assert_eq!(engine.stats().policy_update_count(), 1);
    }

    #[test]
    fn test_snapshot_survives_installs() {
        let engine = CspEngine::new(sample_policy());
        let pinned = engine.snapshot();
        engine.install(Policy::new());
        assert!(pinned.policy().directive(DirectiveName::ScriptSrc).is_some());
        assert!(engine
            .snapshot()
            .policy()
            .directive(DirectiveName::ScriptSrc)
            .is_none());
    }

    #[test]
    fn test_engine_nonce_generation_counts() {
        let engine = CspEngine::default();
        let nonce = engine.generate_nonce();
        assert_eq!(nonce.len(), 32);
        assert_eq!(engine.stats().nonce_generation_count(), 1);
    }

    #[test]
    fn test_engine_clones_share_state() {
        let engine = CspEngine::new(sample_policy());
        let other = engine.clone();
        other.install(Policy::new());
        assert_eq!(engine.snapshot().policy().directive_count(), 0);
        assert_eq!(engine.stats().policy_update_count(), 1);
    }
}
