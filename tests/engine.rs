//! End-to-end tests for the engine, configuration and data ingestion.
mod common;
use common::*;
use kyoki::prelude::*;
use std::time::Duration;

fn engine(min_support: u64, min_confidence: f64) -> Engine {
    Engine::builder()
        .min_support(min_support)
        .min_confidence(min_confidence)
        .build()
        .unwrap()
}

#[test]
fn test_pair_scenario_end_to_end() {
    let set = create_pair_scenario();
    let model = engine(3, 0.5).run(set.transactions()).unwrap();

    assert_eq!(model.itemsets().len(), 3);
    assert_eq!(model.rules().len(), 2);
    assert_eq!(model.support_of(&ids(&set, &["B", "A"])), Some(3));
    assert_eq!(model.support_of(&ids(&set, &["C"])), None);
    assert_eq!(model.support_table().len(), 3);

    let recommendation = model.query(id(&set, "B"));
    assert_eq!(
        set.catalog().resolve(recommendation.items().unwrap()),
        vec!["A".to_string()]
    );
    assert_eq!(model.query(id(&set, "C")), Recommendation::NoMatch);

    let stats = model.stats();
    assert_eq!(stats.transactions, 4);
    assert_eq!(stats.frequent_items, 2);
    assert_eq!(stats.tree_nodes, 2);
}

#[test]
fn test_empty_input_yields_empty_model() {
    let model = engine(1, 0.5).run(&[]).unwrap();
    assert!(model.itemsets().is_empty());
    assert!(model.rules().is_empty());
    assert!(model.index().is_empty());
    assert!(model.all_antecedent_items().is_empty());
}

#[test]
fn test_recommend_applies_top_k() {
    let set = create_reading_club();
    let seed = id(&set, "A");

    let unlimited = Engine::builder()
        .min_support(2)
        .min_confidence(0.1)
        .top_k(None)
        .build()
        .unwrap()
        .run(set.transactions())
        .unwrap();
    assert_eq!(unlimited.recommend(seed).unwrap().len(), 2);

    let top_one = Engine::builder()
        .min_support(2)
        .min_confidence(0.1)
        .top_k(Some(1))
        .build()
        .unwrap()
        .run(set.transactions())
        .unwrap();
    let ranked = top_one.recommend(seed).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].item, id(&set, "B"));
    assert!(top_one.recommend(ItemId(999)).is_none());
}

#[test]
fn test_runs_are_deterministic() {
    let set = create_textbook_transactions();
    let engine = engine(2, 0.3);

    let first = engine.run(set.transactions()).unwrap();
    let second = engine.run(set.transactions()).unwrap();
    assert_eq!(first.rules(), second.rules());
    assert_eq!(as_map(first.itemsets()), as_map(second.itemsets()));
}

#[test]
fn test_sequential_and_parallel_runs_agree() {
    let set = create_textbook_transactions();
    let build = |parallel| {
        Engine::builder()
            .min_support(2)
            .min_confidence(0.3)
            .parallel(parallel)
            .build()
            .unwrap()
    };

    let sequential = build(false).run(set.transactions()).unwrap();
    let parallel = build(true).run(set.transactions()).unwrap();
    assert_eq!(sequential.rules(), parallel.rules());
    assert_eq!(as_map(sequential.itemsets()), as_map(parallel.itemsets()));
}

#[test]
fn test_builder_rejects_invalid_thresholds() {
    assert_eq!(
        Engine::builder().min_support(0).build().unwrap_err(),
        ConfigError::InvalidMinSupport(0)
    );
    assert_eq!(
        Engine::builder().min_confidence(0.0).build().unwrap_err(),
        ConfigError::InvalidMinConfidence(0.0)
    );
    assert_eq!(
        Engine::builder().top_k(Some(0)).build().unwrap_err(),
        ConfigError::InvalidTopK
    );
}

#[test]
fn test_cancelled_run_returns_error() {
    let set = create_textbook_transactions();
    let engine = engine(2, 0.5);
    let token = CancelToken::new();

    token.cancel();
    assert_eq!(
        engine.run_with_cancel(set.transactions(), &token).unwrap_err(),
        MiningError::Cancelled
    );
}

#[test]
fn test_cancelling_one_run_leaves_later_runs_unaffected() {
    let set = create_pair_scenario();
    let engine = engine(3, 0.5);
    let token = CancelToken::new();

    token.cancel();
    assert!(engine.run_with_cancel(set.transactions(), &token).is_err());
    assert_eq!(engine.run(set.transactions()).unwrap().rules().len(), 2);
    assert_eq!(
        engine
            .run_with_cancel(set.transactions(), &CancelToken::new())
            .unwrap()
            .rules()
            .len(),
        2
    );
}

#[test]
fn test_caller_deadline_survives_configured_deadline() {
    let set = create_pair_scenario();
    let engine = Engine::builder()
        .min_support(3)
        .deadline(Duration::from_secs(60))
        .build()
        .unwrap();

    let expired = CancelToken::with_deadline(Duration::ZERO);
    assert!(matches!(
        engine.run_with_cancel(set.transactions(), &expired),
        Err(MiningError::DeadlineExceeded { .. })
    ));

    let generous = CancelToken::with_deadline(Duration::from_secs(60));
    assert!(engine.run_with_cancel(set.transactions(), &generous).is_ok());
}

#[test]
fn test_huge_deadline_saturates() {
    let engine = Engine::builder()
        .min_support(3)
        .deadline(Duration::MAX)
        .build()
        .unwrap();
    assert_eq!(engine.config().deadline_ms, Some(u64::MAX));
}

#[test]
fn test_threshold_above_every_count_yields_no_match() {
    let set = create_pair_scenario();
    let model = engine(10, 0.5).run(set.transactions()).unwrap();

    assert!(model.itemsets().is_empty());
    assert!(model.rules().is_empty());
    assert!(model.all_antecedent_items().is_empty());
    for name in ["A", "B", "C"] {
        assert_eq!(model.query(id(&set, name)), Recommendation::NoMatch);
        assert!(model.recommend(id(&set, name)).is_none());
    }
}

#[test]
fn test_expired_deadline_returns_error() {
    let set = create_textbook_transactions();
    let engine = Engine::builder()
        .min_support(2)
        .deadline(Duration::ZERO)
        .build()
        .unwrap();

    assert!(matches!(
        engine.run(set.transactions()),
        Err(MiningError::DeadlineExceeded { .. })
    ));
}

#[test]
fn test_generous_deadline_completes() {
    let set = create_pair_scenario();
    let engine = Engine::builder()
        .min_support(3)
        .deadline(Duration::from_secs(60))
        .build()
        .unwrap();
    assert_eq!(engine.run(set.transactions()).unwrap().rules().len(), 2);
}

#[test]
fn test_config_defaults_and_overrides() {
    assert_eq!(MiningConfig::from_json("{}").unwrap(), MiningConfig::default());

    let config = MiningConfig::from_json(
        r#"{ "min_support": 50, "min_confidence": 0.6, "top_k": null, "consequents": "any" }"#,
    )
    .unwrap();
    assert_eq!(config.min_support, 50);
    assert_eq!(config.min_confidence, 0.6);
    assert_eq!(config.top_k, None);
    assert_eq!(config.consequents, ConsequentSize::Any);
    assert!(config.parallel);

    let engine = EngineBuilder::from_config(config.clone()).build().unwrap();
    assert_eq!(engine.config(), &config);
}

#[test]
fn test_config_validation_errors() {
    assert_eq!(
        MiningConfig::from_json(r#"{ "min_support": 0 }"#).unwrap_err(),
        ConfigError::InvalidMinSupport(0)
    );
    assert_eq!(
        MiningConfig::from_json(r#"{ "min_confidence": 1.5 }"#).unwrap_err(),
        ConfigError::InvalidMinConfidence(1.5)
    );
    assert!(matches!(
        MiningConfig::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        MiningConfig::from_file("/nonexistent/kyoki/config.json"),
        Err(ConfigError::ReadFile { .. })
    ));
}

#[test]
fn test_interactions_group_positive_ratings_per_user() {
    let interactions = vec![
        Interaction::new("u1", "A", 5.0),
        Interaction::new("u1", "B", 3.0),
        Interaction::new("u1", "A", 4.0),
        Interaction::new("u2", "A", 4.0),
        Interaction::new("u2", "C", 0.0),
        Interaction::new("u3", "C", 0.0),
    ];
    let set = interactions.into_transactions().unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.catalog().names(), &["A".to_string(), "B".to_string()]);
    assert_eq!(set.transactions()[0].items(), ids(&set, &["A", "B"]).as_slice());
    assert_eq!(set.support_of(&ids(&set, &["A"])), 2);
}

#[test]
fn test_invalid_interactions_are_rejected() {
    let empty_user = vec![Interaction::new(" ", "A", 1.0)];
    assert!(matches!(
        empty_user.into_transactions(),
        Err(IngestError::Validation(_))
    ));

    let bad_rating = vec![Interaction::new("u1", "A", f64::NAN)];
    assert!(matches!(
        bad_rating.into_transactions(),
        Err(IngestError::Validation(_))
    ));

    let empty_item = vec![vec!["A".to_string(), String::new()]];
    assert!(matches!(
        empty_item.into_transactions(),
        Err(IngestError::Validation(_))
    ));
}

#[test]
fn test_transaction_file_round_trip_through_disk() {
    let file = TransactionFile {
        transactions: vec![
            vec!["Dune".to_string(), "Emma".to_string()],
            vec!["Dune".to_string()],
        ],
    };
    let path = std::env::temp_dir().join(format!("kyoki-test-{}.json", std::process::id()));
    let path = path.to_str().unwrap();

    file.save(path).unwrap();
    let loaded = TransactionFile::from_file(path).unwrap();
    std::fs::remove_file(path).unwrap();
    assert_eq!(loaded, file);

    let set = loaded.into_transactions().unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.support_of(&ids(&set, &["Dune"])), 2);
}

#[test]
fn test_transaction_file_errors() {
    assert!(matches!(
        TransactionFile::from_json(r#"{ "transactions": 3 }"#),
        Err(IngestError::Parse(_))
    ));
    assert!(matches!(
        TransactionFile::from_file("/nonexistent/kyoki/transactions.json"),
        Err(IngestError::ReadFile { .. })
    ));
}
