// ABOUTME: Concurrency tests for recipe id allocation
// ABOUTME: Many simultaneous creates must receive distinct, gap-free ids on every backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{submission, user_ctx, FakeScraper};
use futures_util::future::join_all;
use recipe_hub::config::DatabaseUrl;
use recipe_hub::database::Stores;
use recipe_hub::models::UserId;
use recipe_hub::services::RecipeService;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const CONCURRENT_CREATES: u64 = 24;

async fn create_concurrently(service: &RecipeService) -> BTreeSet<u64> {
    let tasks = (0..CONCURRENT_CREATES).map(|n| {
        let service = service.clone();
        tokio::spawn(async move {
            let ctx = user_ctx(&format!("user-{}", n % 3));
            service
                .create_manual(&ctx, &submission(&format!("Recipe {n}")))
                .await
                .unwrap()
                .recipe
                .recipe_id
                .get()
        })
    });
    join_all(tasks)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_in_memory() {
    let service = common::memory_service();
    let ids = create_concurrently(&service).await;
    assert_eq!(ids, (1..=CONCURRENT_CREATES).collect());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_on_sqlite_file() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("recipes.db"),
    };
    let stores = Stores::open(&url, Duration::from_secs(10)).await.unwrap();
    let service = RecipeService::new(stores, Arc::new(FakeScraper::failing()), 10);

    let ids = create_concurrently(&service).await;
    assert_eq!(ids, (1..=CONCURRENT_CREATES).collect());

    // Every create attached its owner
    let mut owned = 0;
    for n in 0..3 {
        let user = UserId::new(format!("user-{n}")).unwrap();
        owned += service.starred_recipes(&user).await.unwrap().len();
    }
    assert_eq!(owned as u64, CONCURRENT_CREATES);
}
