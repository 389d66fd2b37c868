// service/job_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{
        chatdb::ChatExt, db::DBClient, offerdb::OfferExt, postdb::PostExt, reviewdb::ReviewExt,
    },
    models::{
        chatmodels::MessageType,
        notificationmodel::NotificationType,
        offermodel::Offer,
        postmodel::{Post, PostStatus},
        reviewmodel::Review,
        usermodel::User,
    },
    service::{error::ServiceError, notification_service::NotificationService},
};

/// Who the review targets and whether writing it closes the post. Only the
/// owner's review closes; the maker's never changes the post status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPlan {
    pub target_user_id: Uuid,
    pub close_post: bool,
}

/// One pending notification: who gets it, what kind, what it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub recipient: Uuid,
    pub kind: NotificationType,
    pub related_id: Uuid,
}

/// Everything that follows a successful maker assignment: the conversation
/// pair, the system line announcing the match, and the maker's notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFollowUp {
    pub participants: (Uuid, Uuid),
    pub system_line: String,
    pub system_line_type: MessageType,
    pub related_post_id: Uuid,
    pub notice: Notice,
}

/// Lifecycle engine for repair jobs: offers, assignment, completion, reviews.
#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    notifications: Arc<NotificationService>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>, notifications: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notifications,
        }
    }

    pub async fn create_offer(
        &self,
        maker: &User,
        post_id: Uuid,
        message: &str,
        price: Option<f64>,
    ) -> Result<Offer, ServiceError> {
        let post = self
            .db_client
            .get_post(post_id)
            .await?
            .ok_or(ServiceError::PostNotFound(post_id))?;

        ensure_can_offer(&post, maker)?;

        let offer = self
            .db_client
            .upsert_offer(post_id, maker.id, post.user_id, message, price)
            .await?;

        self.dispatch(Notice {
            recipient: post.user_id,
            kind: NotificationType::Offer,
            related_id: offer.id,
        })
        .await;

        Ok(offer)
    }

    /// Owner accepts a maker's bid: the post moves to in_progress with the
    /// maker assigned, a conversation between the two opens with a system
    /// line, and the maker is notified.
    pub async fn accept_offer(&self, owner_id: Uuid, offer_id: Uuid) -> Result<Post, ServiceError> {
        let offer = self
            .db_client
            .get_offer(offer_id)
            .await?
            .ok_or(ServiceError::OfferNotFound(offer_id))?;

        let post = self
            .db_client
            .get_post(offer.post_id)
            .await?
            .ok_or(ServiceError::PostNotFound(offer.post_id))?;

        if post.user_id != owner_id {
            return Err(ServiceError::Authorization);
        }

        // The guarded update settles races between two accepts: only one
        // caller finds the post still open.
        let post = self
            .db_client
            .assign_maker_and_start(post.id, offer.maker_id)
            .await?
            .ok_or_else(|| {
                ServiceError::StateConflict(format!(
                    "Post is no longer open (currently {})",
                    post.status.to_str()
                ))
            })?;

        let follow_up = accept_follow_up(&post, &offer);

        let conversation = self
            .db_client
            .get_or_create_conversation(follow_up.participants.0, follow_up.participants.1)
            .await?;

        self.db_client
            .send_message(
                conversation.id,
                owner_id,
                &follow_up.system_line,
                follow_up.system_line_type,
                Some(follow_up.related_post_id),
            )
            .await?;

        self.dispatch(follow_up.notice).await;

        Ok(post)
    }

    pub async fn decline_offer(&self, owner_id: Uuid, offer_id: Uuid) -> Result<(), ServiceError> {
        let offer = self
            .db_client
            .get_offer(offer_id)
            .await?
            .ok_or(ServiceError::OfferNotFound(offer_id))?;

        if offer.user_id != owner_id {
            return Err(ServiceError::Authorization);
        }

        self.db_client.delete_offer(offer_id).await?;
        Ok(())
    }

    pub async fn withdraw_offer(
        &self,
        maker_id: Uuid,
        offer_id: Uuid,
    ) -> Result<(), ServiceError> {
        let offer = self
            .db_client
            .get_offer(offer_id)
            .await?
            .ok_or(ServiceError::OfferNotFound(offer_id))?;

        if offer.maker_id != maker_id {
            return Err(ServiceError::Authorization);
        }

        self.db_client.delete_offer(offer_id).await?;
        Ok(())
    }

    /// Owner removes the assigned maker: the maker slot empties, the post
    /// reopens, and the removed maker is notified. A second unassign finds
    /// the post already open and conflicts.
    pub async fn unassign_maker(&self, owner_id: Uuid, post_id: Uuid) -> Result<Post, ServiceError> {
        let post = self
            .db_client
            .get_post(post_id)
            .await?
            .ok_or(ServiceError::PostNotFound(post_id))?;

        let maker_id = ensure_owner_of_assigned(&post, owner_id)?;

        let reopened = self
            .db_client
            .clear_maker(post_id)
            .await?
            .ok_or_else(|| {
                ServiceError::StateConflict(format!(
                    "Post is not in progress (currently {})",
                    post.status.to_str()
                ))
            })?;

        self.dispatch(unassign_notice(maker_id, post_id)).await;

        Ok(reopened)
    }

    /// Owner declares the repair done. Their review is still needed before
    /// the job closes.
    pub async fn mark_fixed(&self, owner_id: Uuid, post_id: Uuid) -> Result<Post, ServiceError> {
        let post = self
            .db_client
            .get_post(post_id)
            .await?
            .ok_or(ServiceError::PostNotFound(post_id))?;

        if post.user_id != owner_id {
            return Err(ServiceError::Authorization);
        }
        ensure_transition(&post, PostStatus::Fixed)?;

        Ok(self
            .db_client
            .update_post_status(post_id, PostStatus::Fixed)
            .await?)
    }

    /// Either party reviews the other once the repair is declared fixed.
    /// The owner's review closes the post and credits the maker with a
    /// completed repair.
    pub async fn submit_review(
        &self,
        reviewer_id: Uuid,
        post_id: Uuid,
        rating: f64,
        comment: Option<&str>,
    ) -> Result<(Review, Post), ServiceError> {
        let post = self
            .db_client
            .get_post(post_id)
            .await?
            .ok_or(ServiceError::PostNotFound(post_id))?;

        let plan = review_plan(&post, reviewer_id)?;

        if self.db_client.has_reviewed(reviewer_id, post_id).await? {
            return Err(ServiceError::StateConflict(
                "You have already reviewed this job".to_string(),
            ));
        }

        let (review, post) = self
            .db_client
            .save_review(
                reviewer_id,
                plan.target_user_id,
                post_id,
                rating,
                comment,
                plan.close_post,
            )
            .await?;

        if plan.close_post {
            self.dispatch(Notice {
                recipient: plan.target_user_id,
                kind: NotificationType::JobCompleted,
                related_id: post_id,
            })
            .await;
        }

        Ok((review, post))
    }

    /// Owner cancels an open post outright. Once a maker is assigned the
    /// owner has to unassign first.
    pub async fn cancel_post(&self, owner_id: Uuid, post_id: Uuid) -> Result<Post, ServiceError> {
        let post = self
            .db_client
            .get_post(post_id)
            .await?
            .ok_or(ServiceError::PostNotFound(post_id))?;

        if post.user_id != owner_id {
            return Err(ServiceError::Authorization);
        }
        ensure_cancellable(&post)?;

        Ok(self
            .db_client
            .update_post_status(post_id, PostStatus::Closed)
            .await?)
    }

    async fn dispatch(&self, notice: Notice) {
        self.notifications
            .dispatch(notice.recipient, notice.kind, notice.related_id)
            .await;
    }
}

/// Effects of a successful accept: the owner-maker conversation gets one
/// system line naming the post, and the maker learns their offer was taken.
fn accept_follow_up(post: &Post, offer: &Offer) -> AcceptFollowUp {
    AcceptFollowUp {
        participants: (post.user_id, offer.maker_id),
        system_line: format!("Offer accepted for \"{}\"", post.title),
        system_line_type: MessageType::SystemEvent,
        related_post_id: post.id,
        notice: Notice {
            recipient: offer.maker_id,
            kind: NotificationType::Accept,
            related_id: offer.id,
        },
    }
}

/// The removed maker hears about it; nobody else does.
fn unassign_notice(maker_id: Uuid, post_id: Uuid) -> Notice {
    Notice {
        recipient: maker_id,
        kind: NotificationType::Unassign,
        related_id: post_id,
    }
}

/// Cancelling is the open -> closed shortcut only. A fixed post also may
/// move to closed, but that edge belongs to the review path.
fn ensure_cancellable(post: &Post) -> Result<(), ServiceError> {
    if post.status != PostStatus::Open {
        return Err(ServiceError::StateConflict(format!(
            "Only open posts can be cancelled (currently {})",
            post.status.to_str()
        )));
    }
    Ok(())
}

fn ensure_can_offer(post: &Post, maker: &User) -> Result<(), ServiceError> {
    if !maker.maker {
        return Err(ServiceError::Validation(
            "Only makers can bid on posts".to_string(),
        ));
    }
    if post.user_id == maker.id {
        return Err(ServiceError::Validation(
            "You cannot bid on your own post".to_string(),
        ));
    }
    if post.status != PostStatus::Open {
        return Err(ServiceError::StateConflict(format!(
            "Post is not open for offers (currently {})",
            post.status.to_str()
        )));
    }
    Ok(())
}

/// Owner only, and a maker must actually be assigned; returns the maker's id.
fn ensure_owner_of_assigned(post: &Post, owner_id: Uuid) -> Result<Uuid, ServiceError> {
    if owner_id != post.user_id {
        return Err(ServiceError::Authorization);
    }
    post.maker_id
        .ok_or_else(|| ServiceError::StateConflict("Post has no assigned maker".to_string()))
}

fn ensure_transition(post: &Post, to: PostStatus) -> Result<(), ServiceError> {
    if !post.status.can_transition(to) {
        return Err(ServiceError::StateConflict(format!(
            "Cannot move post from {} to {}",
            post.status.to_str(),
            to.to_str()
        )));
    }
    Ok(())
}

fn review_plan(post: &Post, reviewer_id: Uuid) -> Result<ReviewPlan, ServiceError> {
    if post.status != PostStatus::Fixed && post.status != PostStatus::Closed {
        return Err(ServiceError::StateConflict(format!(
            "Post is not ready for review (currently {})",
            post.status.to_str()
        )));
    }

    let maker_id = post.maker_id.ok_or_else(|| {
        ServiceError::StateConflict("Post has no assigned maker".to_string())
    })?;

    if reviewer_id == post.user_id {
        Ok(ReviewPlan {
            target_user_id: maker_id,
            // Closing is idempotent across the two review sides: only the
            // owner's review on a still-fixed post flips the status.
            close_post: post.status == PostStatus::Fixed,
        })
    } else if reviewer_id == maker_id {
        Ok(ReviewPlan {
            target_user_id: post.user_id,
            close_post: false,
        })
    } else {
        Err(ServiceError::Authorization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(status: PostStatus, owner: Uuid, maker: Option<Uuid>) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Broken toaster".to_string(),
            description: None,
            image_url: None,
            r#type: None,
            target_price: None,
            maker_id: maker,
            status,
            lat: None,
            long: None,
            score: None,
            created_at: Utc::now(),
        }
    }

    fn user(id: Uuid, maker: bool) -> User {
        User {
            id,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            password_hash: String::new(),
            phone_number: None,
            image: None,
            bio: None,
            maker_bio: None,
            maker,
            lat: None,
            long: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn offers_require_maker_flag_and_open_post() {
        let owner = Uuid::new_v4();
        let bidder = user(Uuid::new_v4(), true);

        assert!(ensure_can_offer(&post(PostStatus::Open, owner, None), &bidder).is_ok());

        let not_maker = user(bidder.id, false);
        assert!(matches!(
            ensure_can_offer(&post(PostStatus::Open, owner, None), &not_maker),
            Err(ServiceError::Validation(_))
        ));

        assert!(matches!(
            ensure_can_offer(&post(PostStatus::InProgress, owner, Some(Uuid::new_v4())), &bidder),
            Err(ServiceError::StateConflict(_))
        ));
    }

    #[test]
    fn no_bidding_on_own_post() {
        let owner = user(Uuid::new_v4(), true);
        assert!(matches!(
            ensure_can_offer(&post(PostStatus::Open, owner.id, None), &owner),
            Err(ServiceError::Validation(_))
        ));
    }

    fn offer_on(post: &Post, maker: Uuid) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            post_id: post.id,
            maker_id: maker,
            user_id: post.user_id,
            message: "I can fix this".to_string(),
            price: Some(25.0),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn accept_opens_chat_with_system_line_and_notifies_maker() {
        let owner = Uuid::new_v4();
        let maker = Uuid::new_v4();
        let p = post(PostStatus::InProgress, owner, Some(maker));
        let o = offer_on(&p, maker);

        let follow_up = accept_follow_up(&p, &o);
        assert_eq!(follow_up.participants, (owner, maker));
        assert_eq!(follow_up.system_line, "Offer accepted for \"Broken toaster\"");
        assert_eq!(follow_up.system_line_type, MessageType::SystemEvent);
        assert_eq!(follow_up.related_post_id, p.id);
        assert_eq!(
            follow_up.notice,
            Notice {
                recipient: maker,
                kind: NotificationType::Accept,
                related_id: o.id,
            }
        );
    }

    #[test]
    fn unassign_notifies_the_removed_maker() {
        let maker = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        assert_eq!(
            unassign_notice(maker, post_id),
            Notice {
                recipient: maker,
                kind: NotificationType::Unassign,
                related_id: post_id,
            }
        );
    }

    #[test]
    fn only_the_owner_may_unassign() {
        let owner = Uuid::new_v4();
        let maker = Uuid::new_v4();
        let p = post(PostStatus::InProgress, owner, Some(maker));

        assert_eq!(ensure_owner_of_assigned(&p, owner).unwrap(), maker);
        assert!(matches!(
            ensure_owner_of_assigned(&p, maker),
            Err(ServiceError::Authorization)
        ));
        assert!(matches!(
            ensure_owner_of_assigned(&p, Uuid::new_v4()),
            Err(ServiceError::Authorization)
        ));
    }

    #[test]
    fn unassign_without_maker_conflicts() {
        let owner = Uuid::new_v4();
        assert!(matches!(
            ensure_owner_of_assigned(&post(PostStatus::Open, owner, None), owner),
            Err(ServiceError::StateConflict(_))
        ));
    }

    #[test]
    fn owner_review_on_fixed_post_closes_it() {
        let owner = Uuid::new_v4();
        let maker = Uuid::new_v4();
        let plan = review_plan(&post(PostStatus::Fixed, owner, Some(maker)), owner).unwrap();
        assert_eq!(plan.target_user_id, maker);
        assert!(plan.close_post);
    }

    #[test]
    fn maker_review_never_closes() {
        let owner = Uuid::new_v4();
        let maker = Uuid::new_v4();
        for status in [PostStatus::Fixed, PostStatus::Closed] {
            let plan = review_plan(&post(status, owner, Some(maker)), maker).unwrap();
            assert_eq!(plan.target_user_id, owner);
            assert!(!plan.close_post);
        }
    }

    #[test]
    fn owner_review_on_closed_post_stays_closed() {
        let owner = Uuid::new_v4();
        let maker = Uuid::new_v4();
        let plan = review_plan(&post(PostStatus::Closed, owner, Some(maker)), owner).unwrap();
        assert!(!plan.close_post);
    }

    #[test]
    fn reviews_rejected_before_fixed_and_from_strangers() {
        let owner = Uuid::new_v4();
        let maker = Uuid::new_v4();

        assert!(matches!(
            review_plan(&post(PostStatus::InProgress, owner, Some(maker)), owner),
            Err(ServiceError::StateConflict(_))
        ));
        assert!(matches!(
            review_plan(&post(PostStatus::Fixed, owner, Some(maker)), Uuid::new_v4()),
            Err(ServiceError::Authorization)
        ));
    }

    #[test]
    fn cancel_only_from_open() {
        let owner = Uuid::new_v4();
        assert!(ensure_cancellable(&post(PostStatus::Open, owner, None)).is_ok());
        for status in [PostStatus::InProgress, PostStatus::Fixed, PostStatus::Closed] {
            assert!(matches!(
                ensure_cancellable(&post(status, owner, Some(Uuid::new_v4()))),
                Err(ServiceError::StateConflict(_))
            ));
        }
    }

    #[test]
    fn fixed_requires_in_progress() {
        let owner = Uuid::new_v4();
        let maker = Some(Uuid::new_v4());
        assert!(
            ensure_transition(&post(PostStatus::InProgress, owner, maker), PostStatus::Fixed)
                .is_ok()
        );
        assert!(matches!(
            ensure_transition(&post(PostStatus::Open, owner, None), PostStatus::Fixed),
            Err(ServiceError::StateConflict(_))
        ));
    }
}
