// ABOUTME: Integration tests for the SQLite recipe and relationship stores
// ABOUTME: Validates persistence across reopen, id watermarks, filters, and relationship fan-out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{submission, user_ctx, FakeScraper};
use recipe_hub::config::DatabaseUrl;
use recipe_hub::database::{RecipeFilter, Stores};
use recipe_hub::errors::ErrorCode;
use recipe_hub::models::{RecipeId, RelationshipKind, UserId};
use recipe_hub::normalization::{
    CategoryInput, FlagInput, IntInput, ManualSubmission, ServingsInput,
};
use recipe_hub::services::{RecipeService, RequestContext};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn open_service(dir: &TempDir) -> RecipeService {
    common::init_test_logging();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("nested").join("recipes.db"),
    };
    let stores = Stores::open(&url, Duration::from_secs(5)).await.unwrap();
    assert_eq!(stores.backend(), "sqlite");
    RecipeService::new(stores, Arc::new(FakeScraper::failing()), 5)
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let ctx = user_ctx("alice");

    let created = {
        let service = open_service(&dir).await;
        service.create_manual(&ctx, &submission("Rice")).await.unwrap()
    };

    let service = open_service(&dir).await;
    let stored = service
        .get_recipe(created.recipe.recipe_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Rice");
    assert_eq!(stored.ingredients, created.recipe.ingredients);
    assert_eq!(stored.directions, vec!["Boil water.", "Add rice."]);
    assert_eq!(stored.time, created.recipe.time);
    assert_eq!(stored.meta.votes, 1);

    let alice = UserId::new("alice").unwrap();
    assert!(service.is_starred(&alice, stored.recipe_id).await.unwrap());
}

#[tokio::test]
async fn test_every_submitted_field_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let ctx = user_ctx("alice");
    let full = ManualSubmission {
        name: Some("Braised Leeks".to_owned()),
        category: Some(CategoryInput::List(vec![
            "side".to_owned(),
            "vegetarian".to_owned(),
        ])),
        ingredients: Some("For the leeks:\n4 leeks, halved\n1 1/2 cups stock".to_owned()),
        directions: Some("Brown the leeks.\n\nAdd stock and braise.".to_owned()),
        hidden: Some(FlagInput::Text("true".to_owned())),
        prep_hours: Some(IntInput::Int(1)),
        prep_minutes: Some(IntInput::Float(5.9)),
        cook_hours: Some(IntInput::Text("2".to_owned())),
        cook_minutes: Some(IntInput::Int(45)),
        rating: Some(4.5),
        url: Some("https://example.com/leeks".to_owned()),
        image_url: Some("/img/leeks.png".to_owned()),
        serving_size: Some(ServingsInput::Text("serves 6".to_owned())),
    };

    let created = {
        let service = open_service(&dir).await;
        service.create_manual(&ctx, &full).await.unwrap()
    };
    assert!(created.recipe.hidden);
    assert_eq!(created.recipe.serving_size, Some(6));
    assert_eq!(created.recipe.meta.rating, Some(4.5));

    let service = open_service(&dir).await;
    let stored = service
        .get_recipe(created.recipe.recipe_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, created.recipe);
}

#[tokio::test]
async fn test_edit_at_max_id_keeps_store_usable() {
    let dir = TempDir::new().unwrap();
    let ctx = user_ctx("alice");
    let service = open_service(&dir).await;
    service.create_manual(&ctx, &submission("First")).await.unwrap();

    let edited = service
        .edit(&ctx, RecipeId::MAX, &submission("Last"))
        .await
        .unwrap();
    assert_eq!(edited.recipe_id, RecipeId::MAX);

    let stored = service.get_recipe(RecipeId::MAX).await.unwrap().unwrap();
    assert_eq!(stored.recipe_id, RecipeId::MAX);

    let err = service.create_manual(&ctx, &submission("Next")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
    assert_eq!(service.list_public().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleted_ids_stay_retired_after_reopen() {
    let dir = TempDir::new().unwrap();
    let ctx = user_ctx("alice");
    {
        let service = open_service(&dir).await;
        for name in ["One", "Two", "Three"] {
            service.create_manual(&ctx, &submission(name)).await.unwrap();
        }
        service
            .hard_delete(&RequestContext::anonymous(), RecipeId::new(3).unwrap())
            .await
            .unwrap();
    }

    let service = open_service(&dir).await;
    let next = service.create_manual(&ctx, &submission("Four")).await.unwrap();
    assert_eq!(next.recipe.recipe_id, RecipeId::new(4).unwrap());
}

#[tokio::test]
async fn test_search_and_hidden_filtering() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir).await;
    let ctx = user_ctx("alice");
    service.create_manual(&ctx, &submission("Tomato Soup")).await.unwrap();
    let pie = service
        .create_manual(&ctx, &submission("Tomato Pie"))
        .await
        .unwrap();
    service.remove(&ctx, pie.recipe.recipe_id).await.unwrap();

    let found = service.search("tomato").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Tomato Soup");

    let everything = service
        .stores()
        .recipes
        .find(&RecipeFilter::everything())
        .await
        .unwrap();
    assert_eq!(everything.len(), 2);
}

#[tokio::test]
async fn test_relationship_sets_and_prune() {
    let dir = TempDir::new().unwrap();
    let service = open_service(&dir).await;
    let owner = user_ctx("alice");
    let fan = user_ctx("carol");
    let recipe_id = service
        .create_manual(&owner, &submission("Rice"))
        .await
        .unwrap()
        .recipe
        .recipe_id;

    assert!(service.pin(&fan, recipe_id).await.unwrap().changed);
    assert!(!service.pin(&fan, recipe_id).await.unwrap().changed);

    let relationships = &service.stores().relationships;
    let carol = UserId::new("carol").unwrap();
    let record = relationships.get(&carol).await.unwrap().unwrap();
    assert!(record.contains(RelationshipKind::Pinned, recipe_id));
    assert!(!record.contains(RelationshipKind::Owned, recipe_id));

    let owned = relationships.owned_recipe_ids().await.unwrap();
    assert!(owned.contains(&recipe_id));

    assert_eq!(relationships.prune_recipe(recipe_id).await.unwrap(), 3);
    assert!(relationships.referenced_recipe_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shared_in_memory_sqlite() {
    common::init_test_logging();
    let stores = Stores::open(&DatabaseUrl::Memory, Duration::from_secs(1))
        .await
        .unwrap();
    let service = RecipeService::new(stores, Arc::new(FakeScraper::failing()), 5);
    let ctx = user_ctx("alice");

    let created = service.create_manual(&ctx, &submission("Rice")).await.unwrap();
    assert_eq!(created.recipe.recipe_id, RecipeId::FIRST);
    assert_eq!(service.list_public().await.unwrap().len(), 1);
}
