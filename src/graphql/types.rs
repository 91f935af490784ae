//! Object and input types exposed through GraphQL.

use juniper::{graphql_object, GraphQLInputObject, GraphQLObject, ID};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::context::GraphQLContext;
use crate::{
    applications::{repo::ApplicationDetails, services as applications},
    error::{AppError, AppResult},
    jobs::{dto::JobPatch, repo::Job},
    users::dto::{PublicUser, UserPatch},
};

fn rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

fn id(raw: i32) -> ID {
    ID::from(raw.to_string())
}

pub struct UserObject(pub PublicUser);

#[graphql_object(name = "User", context = GraphQLContext)]
impl UserObject {
    fn id(&self) -> ID {
        id(self.0.id)
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn email(&self) -> &str {
        &self.0.email
    }

    fn created_at(&self) -> String {
        rfc3339(self.0.created_at)
    }

    async fn applications(&self, ctx: &GraphQLContext) -> AppResult<Vec<ApplicationObject>> {
        let found = applications::list_by_user(&ctx.state, self.0.id).await?;
        Ok(found.into_iter().map(ApplicationObject).collect())
    }
}

pub struct JobObject(pub Job);

#[graphql_object(name = "Job", context = GraphQLContext)]
impl JobObject {
    fn id(&self) -> ID {
        id(self.0.id)
    }

    fn title(&self) -> &str {
        &self.0.title
    }

    fn url(&self) -> &str {
        &self.0.url
    }

    fn description(&self) -> &str {
        &self.0.description
    }

    fn company(&self) -> &str {
        &self.0.company
    }

    #[graphql(name = "companyURL")]
    fn company_url(&self) -> &str {
        &self.0.company_url
    }

    fn location(&self) -> &str {
        &self.0.location
    }

    fn posted_at(&self) -> String {
        rfc3339(self.0.posted_at)
    }

    fn created_at(&self) -> String {
        rfc3339(self.0.created_at)
    }

    async fn applications(&self, ctx: &GraphQLContext) -> AppResult<Vec<ApplicationObject>> {
        let found = applications::list_by_job(&ctx.state, self.0.id).await?;
        Ok(found.into_iter().map(ApplicationObject).collect())
    }
}

pub struct ApplicationObject(pub ApplicationDetails);

#[graphql_object(name = "Application", context = GraphQLContext)]
impl ApplicationObject {
    fn id(&self) -> ID {
        id(self.0.id)
    }

    fn user_id(&self) -> i32 {
        self.0.user_id
    }

    fn job_id(&self) -> i32 {
        self.0.job_id
    }

    fn applied_at(&self) -> String {
        rfc3339(self.0.applied_at)
    }

    fn user(&self) -> UserObject {
        UserObject(self.0.user.clone())
    }

    fn job(&self) -> JobObject {
        JobObject(self.0.job.clone())
    }
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserObject,
}

#[derive(Debug, GraphQLInputObject)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateUserInput> for UserPatch {
    fn from(input: UpdateUserInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            password: input.password,
        }
    }
}

#[derive(Debug, GraphQLInputObject)]
pub struct UpdateJobInput {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    #[graphql(name = "companyURL")]
    pub company_url: Option<String>,
    pub location: Option<String>,
    /// RFC 3339 date-time.
    pub posted_at: Option<String>,
}

impl TryFrom<UpdateJobInput> for JobPatch {
    type Error = AppError;

    fn try_from(input: UpdateJobInput) -> Result<Self, Self::Error> {
        let posted_at = input
            .posted_at
            .filter(|s| !s.trim().is_empty())
            .map(|s| OffsetDateTime::parse(s.trim(), &Rfc3339))
            .transpose()
            .map_err(|_| AppError::validation("Invalid postedAt format."))?;
        Ok(Self {
            title: input.title,
            url: input.url,
            description: input.description,
            company: input.company,
            company_url: input.company_url,
            location: input.location,
            posted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_input(posted_at: Option<&str>) -> UpdateJobInput {
        UpdateJobInput {
            title: None,
            url: None,
            description: None,
            company: None,
            company_url: None,
            location: None,
            posted_at: posted_at.map(Into::into),
        }
    }

    #[test]
    fn posted_at_must_be_rfc3339() {
        let patch = JobPatch::try_from(job_input(Some("2024-05-01T10:00:00Z"))).unwrap();
        assert_eq!(patch.posted_at.unwrap().year(), 2024);

        let err = JobPatch::try_from(job_input(Some("yesterday"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(JobPatch::try_from(job_input(None)).unwrap().posted_at.is_none());
    }

    #[test]
    fn timestamps_render_as_rfc3339() {
        assert_eq!(rfc3339(OffsetDateTime::UNIX_EPOCH), "1970-01-01T00:00:00Z");
    }
}
