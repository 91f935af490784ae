use juniper::{graphql_object, EmptySubscription, RootNode, ID};

use super::{
    context::GraphQLContext,
    types::{
        ApplicationObject, AuthResponse, JobObject, UpdateJobInput, UpdateUserInput, UserObject,
    },
};
use crate::{
    applications::services as applications,
    auth::services as auth,
    error::{AppError, AppResult},
    jobs::{dto::JobDraft, filter::JobFilter, services as jobs},
    users::services as users,
    validation::{parse_id, IdKind},
};

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

pub struct Query;

/// Single-item lookups resolve to null when nothing matches.
#[graphql_object(context = GraphQLContext)]
impl Query {
    async fn users(ctx: &GraphQLContext) -> AppResult<Vec<UserObject>> {
        let views = users::list(&ctx.state).await?;
        Ok(views.into_iter().map(|v| UserObject(v.user)).collect())
    }

    async fn user(ctx: &GraphQLContext, id: ID) -> AppResult<Option<UserObject>> {
        let id = parse_id(&id, IdKind::User)?;
        Ok(users::find(&ctx.state, id).await?.map(|u| UserObject(u.into())))
    }

    async fn jobs(
        ctx: &GraphQLContext,
        keyword: Option<String>,
        location: Option<String>,
    ) -> AppResult<Vec<JobObject>> {
        let filter = JobFilter::new(keyword, location)?;
        let found = jobs::list(&ctx.state, &filter).await?;
        Ok(found.into_iter().map(JobObject).collect())
    }

    async fn job(ctx: &GraphQLContext, id: ID) -> AppResult<Option<JobObject>> {
        let id = parse_id(&id, IdKind::Job)?;
        Ok(jobs::find(&ctx.state, id).await?.map(JobObject))
    }

    async fn applications(ctx: &GraphQLContext) -> AppResult<Vec<ApplicationObject>> {
        let found = applications::list(&ctx.state).await?;
        Ok(found.into_iter().map(ApplicationObject).collect())
    }

    async fn application(ctx: &GraphQLContext, id: ID) -> AppResult<Option<ApplicationObject>> {
        let id = parse_id(&id, IdKind::Application)?;
        Ok(applications::find(&ctx.state, id).await?.map(ApplicationObject))
    }

    async fn applications_by_user(ctx: &GraphQLContext) -> AppResult<Vec<ApplicationObject>> {
        let principal = ctx.require_principal()?;
        let found = applications::list_by_user(&ctx.state, principal.user_id).await?;
        Ok(found.into_iter().map(ApplicationObject).collect())
    }
}

pub struct Mutation;

#[graphql_object(context = GraphQLContext)]
impl Mutation {
    async fn signup(
        ctx: &GraphQLContext,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<AuthResponse> {
        let session = auth::signup(&ctx.state, &name, &email, &password).await?;
        Ok(AuthResponse {
            success: true,
            message: "User created successfully.".into(),
            token: session.token,
            user: UserObject(session.user.into()),
        })
    }

    async fn login(ctx: &GraphQLContext, email: String, password: String) -> AppResult<AuthResponse> {
        let session = auth::login(&ctx.state, &email, &password)
            .await
            .map_err(|e| match e {
                AppError::NotFound(msg) => AppError::Unauthenticated(msg),
                other => other,
            })?;
        Ok(AuthResponse {
            success: true,
            message: "Login successful.".into(),
            token: session.token,
            user: UserObject(session.user.into()),
        })
    }

    async fn update_user(ctx: &GraphQLContext, id: ID, data: UpdateUserInput) -> AppResult<UserObject> {
        let principal = ctx.require_principal()?;
        let id = parse_id(&id, IdKind::User)?;
        let user = users::update(&ctx.state, id, data.into(), principal).await?;
        Ok(UserObject(user))
    }

    async fn delete_user(ctx: &GraphQLContext, id: ID) -> AppResult<bool> {
        let principal = ctx.require_principal()?;
        let id = parse_id(&id, IdKind::User)?;
        users::delete(&ctx.state, id, principal).await?;
        Ok(true)
    }

    async fn create_job(
        ctx: &GraphQLContext,
        title: String,
        url: String,
        description: String,
        company: String,
        #[graphql(name = "companyURL")] company_url: String,
        location: String,
    ) -> AppResult<JobObject> {
        let draft = JobDraft {
            title: Some(title),
            url: Some(url),
            description: Some(description),
            company: Some(company),
            company_url: Some(company_url),
            location: Some(location),
        };
        Ok(JobObject(jobs::create(&ctx.state, draft).await?))
    }

    async fn update_job(ctx: &GraphQLContext, id: ID, data: UpdateJobInput) -> AppResult<JobObject> {
        let id = parse_id(&id, IdKind::Job)?;
        let job = jobs::update(&ctx.state, id, data.try_into()?).await?;
        Ok(JobObject(job))
    }

    async fn delete_job(ctx: &GraphQLContext, id: ID) -> AppResult<bool> {
        let id = parse_id(&id, IdKind::Job)?;
        jobs::delete(&ctx.state, id).await?;
        Ok(true)
    }

    async fn create_application(
        ctx: &GraphQLContext,
        user_id: i32,
        job_id: i32,
    ) -> AppResult<ApplicationObject> {
        let principal = ctx.require_principal()?;
        let created = applications::create(&ctx.state, user_id, job_id, principal).await?;
        Ok(ApplicationObject(created))
    }

    async fn delete_application(ctx: &GraphQLContext, id: ID) -> AppResult<bool> {
        let principal = ctx.require_principal()?;
        let id = parse_id(&id, IdKind::Application)?;
        applications::delete(&ctx.state, id, principal).await?;
        Ok(true)
    }
}
