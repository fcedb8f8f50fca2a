//! Vote business logic - casting and counting the daily lunch vote.
//!
//! A user gets one vote per day bucket, spendable only on a menu published
//! in today's bucket. As with menus, the application pre-checks and the
//! unique index on `(user_id, day_bucket)` settles races. Votes are never
//! reassigned or withdrawn.

use crate::{
    core::menus::{self, day_bucket},
    entities::{Menu, Restaurant, Vote, vote},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::sea_query::Alias;
use sea_orm::{
    FromQueryResult, Order, QueryOrder, QuerySelect, Set, SqlErr, prelude::*, sea_query::Expr,
};
use serde::Serialize;

/// One row of the current-day tally: a menu and its vote count, ordered
/// most-voted first.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct TallyRow {
    /// Menu id the votes were cast for.
    pub menu: i64,
    pub votes: i64,
}

/// The winning restaurant of the current day.
#[derive(Debug, Clone, Serialize)]
pub struct Winner {
    /// Name of the restaurant whose menu leads the tally.
    pub restaurant: String,
    pub votes: i64,
}

/// Casts the calling user's vote for a menu published today.
pub async fn cast_vote(db: &DatabaseConnection, user_id: i64, menu_id: i64) -> Result<vote::Model> {
    let now = Utc::now();
    let today = day_bucket(now);

    let menu = menus::get_menu(db, menu_id)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("invalid menu id {menu_id}"),
        })?;
    if menu.day_bucket != today {
        return Err(Error::NotTodaysMenu);
    }

    let existing = Vote::find()
        .filter(vote::Column::UserId.eq(user_id))
        .filter(vote::Column::DayBucket.eq(today))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::AlreadyVoted);
    }

    let vote = vote::ActiveModel {
        user_id: Set(user_id),
        menu_id: Set(menu.id),
        date_time: Set(now),
        day_bucket: Set(today),
        ..Default::default()
    };
    match vote.insert(db).await {
        Ok(model) => Ok(model),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::AlreadyVoted),
            _ => Err(err.into()),
        },
    }
}

/// Tallies today's votes per menu, most-voted first.
///
/// Ties break toward the lower menu id so the ordering, and therefore the
/// winner, is deterministic.
pub async fn current_day_tally<C>(db: &C) -> Result<Vec<TallyRow>>
where
    C: ConnectionTrait,
{
    let today = day_bucket(Utc::now());

    Vote::find()
        .select_only()
        .column_as(vote::Column::MenuId, "menu")
        .column_as(vote::Column::Id.count(), "votes")
        .filter(vote::Column::DayBucket.eq(today))
        .group_by(vote::Column::MenuId)
        .order_by(Expr::col(Alias::new("votes")), Order::Desc)
        .order_by(vote::Column::MenuId, Order::Asc)
        .into_model::<TallyRow>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves today's winning restaurant, or `None` when nobody voted yet.
pub async fn current_day_winner<C>(db: &C) -> Result<Option<Winner>>
where
    C: ConnectionTrait,
{
    let tally = current_day_tally(db).await?;
    let Some(top) = tally.first() else {
        return Ok(None);
    };

    let menu = Menu::find_by_id(top.menu)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "menu" })?;
    let restaurant = Restaurant::find_by_id(menu.restaurant_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "restaurant",
        })?;

    Ok(Some(Winner {
        restaurant: restaurant.name,
        votes: top.votes,
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{DayOfWeek, menu};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_cast_vote_for_todays_menu() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = seed_restaurant_with_menu(&db).await?;
        let voter = create_test_user(&db, "carol", fixture.role.id).await?;

        let vote = cast_vote(&db, voter.id, fixture.menu.id).await?;
        assert_eq!(vote.menu_id, fixture.menu.id);
        assert_eq!(vote.user_id, voter.id);
        assert_eq!(vote.day_bucket, day_bucket(Utc::now()));

        Ok(())
    }

    #[tokio::test]
    async fn test_cast_vote_twice_same_day_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = seed_restaurant_with_menu(&db).await?;
        let voter = create_test_user(&db, "carol", fixture.role.id).await?;

        cast_vote(&db, voter.id, fixture.menu.id).await?;
        let second = cast_vote(&db, voter.id, fixture.menu.id).await;
        assert!(matches!(second.unwrap_err(), Error::AlreadyVoted));

        Ok(())
    }

    #[tokio::test]
    async fn test_cast_vote_rejects_menu_from_another_bucket() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = seed_restaurant_with_menu(&db).await?;
        let voter = create_test_user(&db, "carol", fixture.role.id).await?;

        // Shift the menu into another day's bucket
        let today = day_bucket(Utc::now());
        let other_bucket = if today == 1 { 2 } else { 1 };
        let mut stale: menu::ActiveModel = fixture.menu.clone().into();
        stale.day_bucket = Set(other_bucket);
        stale.update(&db).await?;

        let result = cast_vote(&db, voter.id, fixture.menu.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotTodaysMenu));

        Ok(())
    }

    #[tokio::test]
    async fn test_cast_vote_unknown_menu() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "employee").await?;
        let voter = create_test_user(&db, "carol", role.id).await?;

        let result = cast_vote(&db, voter.id, 999).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_tally_orders_by_count_then_menu_id() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let alice = create_test_user(&db, "alice", role.id).await?;
        let tgt = create_test_restaurant(&db, "TGT", alice.id).await?;
        let branch = create_test_restaurant(&db, "Branch", alice.id).await?;
        let first_menu = publish_test_menu(&db, alice.id, tgt.id, DayOfWeek::Monday).await?;
        let second_menu = publish_test_menu(&db, alice.id, branch.id, DayOfWeek::Monday).await?;

        for (index, menu_id) in [first_menu.id, second_menu.id, second_menu.id]
            .into_iter()
            .enumerate()
        {
            let voter = create_test_user(&db, &format!("voter{index}"), role.id).await?;
            cast_vote(&db, voter.id, menu_id).await?;
        }

        let tally = current_day_tally(&db).await?;
        assert_eq!(
            tally,
            vec![
                TallyRow {
                    menu: second_menu.id,
                    votes: 2
                },
                TallyRow {
                    menu: first_menu.id,
                    votes: 1
                },
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_tally_tie_breaks_toward_lower_menu_id() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let alice = create_test_user(&db, "alice", role.id).await?;
        let tgt = create_test_restaurant(&db, "TGT", alice.id).await?;
        let branch = create_test_restaurant(&db, "Branch", alice.id).await?;
        let first_menu = publish_test_menu(&db, alice.id, tgt.id, DayOfWeek::Monday).await?;
        let second_menu = publish_test_menu(&db, alice.id, branch.id, DayOfWeek::Monday).await?;

        let carol = create_test_user(&db, "carol", role.id).await?;
        let dave = create_test_user(&db, "dave", role.id).await?;
        cast_vote(&db, carol.id, second_menu.id).await?;
        cast_vote(&db, dave.id, first_menu.id).await?;

        let tally = current_day_tally(&db).await?;
        assert_eq!(tally[0].menu, first_menu.id);
        assert_eq!(tally[1].menu, second_menu.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_winner_names_leading_restaurant() -> Result<()> {
        let db = setup_test_db().await?;
        let role = create_test_role(&db, "restaurant_owner").await?;
        let alice = create_test_user(&db, "alice", role.id).await?;
        let tgt = create_test_restaurant(&db, "TGT", alice.id).await?;
        let menu = publish_test_menu(&db, alice.id, tgt.id, DayOfWeek::Monday).await?;

        let carol = create_test_user(&db, "carol", role.id).await?;
        cast_vote(&db, carol.id, menu.id).await?;

        let winner = current_day_winner(&db).await?.unwrap();
        assert_eq!(winner.restaurant, "TGT");
        assert_eq!(winner.votes, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_winner_is_none_without_votes() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(current_day_winner(&db).await?.is_none());
        assert!(current_day_tally(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_votes_from_other_buckets_do_not_count() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = seed_restaurant_with_menu(&db).await?;
        let voter = create_test_user(&db, "carol", fixture.role.id).await?;

        let vote = cast_vote(&db, voter.id, fixture.menu.id).await?;

        // Move the vote into another day's bucket
        let today = day_bucket(Utc::now());
        let other_bucket = if today == 1 { 2 } else { 1 };
        let mut stale: vote::ActiveModel = vote.into();
        stale.day_bucket = Set(other_bucket);
        stale.update(&db).await?;

        assert!(current_day_tally(&db).await?.is_empty());
        assert!(current_day_winner(&db).await?.is_none());

        Ok(())
    }
}
