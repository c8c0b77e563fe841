//! Agent-facing tools: `deploy_site`, `search_project`, `view_project_detail`.
//!
//! Every tool returns a [`ToolResponse`]; errors are folded into
//! `status: "error"` responses so a transport never has to handle them.

pub mod args;
pub mod response;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::HostingBackend;
use crate::deploy::{DeployOutcome, DeployRequest, Deployer};
use crate::error::{DeployError, Result};
use crate::types::{Platform, ProjectId, ProjectName};

pub use args::{DeploySiteArgs, SearchProjectArgs, ViewProjectArgs};
pub use response::{ToolContent, ToolResponse, ToolStatus};

pub const DEPLOY_SITE: &str = "deploy_site";
pub const SEARCH_PROJECT: &str = "search_project";
pub const VIEW_PROJECT_DETAIL: &str = "view_project_detail";

/// Names of all tools served by [`ToolHost`].
pub const TOOL_NAMES: [&str; 3] = [DEPLOY_SITE, SEARCH_PROJECT, VIEW_PROJECT_DETAIL];

/// Serves tool calls against one hosting backend.
#[derive(Debug)]
pub struct ToolHost<B> {
    deployer: Deployer<B>,
    default_platform: Platform,
}

impl<B: HostingBackend> ToolHost<B> {
    pub fn new(deployer: Deployer<B>) -> Self {
        Self {
            deployer,
            default_platform: Platform::default(),
        }
    }

    /// Platform used when `deploy_site` is called without one.
    pub fn with_default_platform(mut self, platform: Platform) -> Self {
        self.default_platform = platform;
        self
    }

    pub fn deployer(&self) -> &Deployer<B> {
        &self.deployer
    }

    pub fn backend(&self) -> &B {
        self.deployer.backend()
    }

    /// Decode `args` for the named tool and run it.
    pub async fn call(&self, name: &str, args: serde_json::Value) -> ToolResponse {
        match name {
            DEPLOY_SITE => match decode_args::<DeploySiteArgs>(args) {
                Ok(args) => self.deploy_site(args).await,
                Err(err) => failure("Failed to deploy", &err),
            },
            SEARCH_PROJECT => match decode_args::<SearchProjectArgs>(args) {
                Ok(args) => self.search_project(args).await,
                Err(err) => failure("Failed to get list", &err),
            },
            VIEW_PROJECT_DETAIL => match decode_args::<ViewProjectArgs>(args) {
                Ok(args) => self.view_project_detail(args).await,
                Err(err) => failure("Failed to get detail", &err),
            },
            other => failure(
                "Failed to call tool",
                &DeployError::invalid_input(format!(
                    "unknown tool '{}' (available: {})",
                    other,
                    TOOL_NAMES.join(", ")
                )),
            ),
        }
    }

    /// Deploy the given files and report the resulting domains and CID.
    pub async fn deploy_site(&self, args: DeploySiteArgs) -> ToolResponse {
        match self.try_deploy(args).await {
            Ok(outcome) => {
                let domains = to_json(&outcome.descriptor.domain_list);
                ToolResponse::success(format!(
                    "The project deployment is successful, here is the web information you need \
                    to provide to the users:domain: {}, cid: {}",
                    domains, outcome.descriptor.file_hash
                ))
                .with_project_id(outcome.project_id.as_str())
            }
            Err(err) => failure("Failed to deploy", &err),
        }
    }

    pub async fn search_project(&self, args: SearchProjectArgs) -> ToolResponse {
        match self.backend().search_project(&args.keyword).await {
            Ok(projects) => {
                tracing::info!(
                    keyword = %args.keyword,
                    results = projects.len(),
                    "Searched projects"
                );
                ToolResponse::success(format!("The project list returns {}", to_json(&projects)))
            }
            Err(err) => failure("Failed to get list", &err),
        }
    }

    /// Fetch one project's detail record.
    ///
    /// Answers with "The project detail returns" / "Failed to get detail"
    /// rather than reusing the list wording of [`Self::search_project`], so
    /// the text names the operation that ran.
    pub async fn view_project_detail(&self, args: ViewProjectArgs) -> ToolResponse {
        let id = match ProjectId::new(args.id) {
            Ok(id) => id,
            Err(err) => return failure("Failed to get detail", &err),
        };

        match self.backend().view_detail(&id).await {
            Ok(detail) => {
                ToolResponse::success(format!("The project detail returns {}", to_json(&detail)))
            }
            Err(err) => failure("Failed to get detail", &err),
        }
    }

    async fn try_deploy(&self, args: DeploySiteArgs) -> Result<DeployOutcome> {
        let project_name = ProjectName::parse(&args.project_name)?;
        let request = DeployRequest::new(project_name, args.code_files)
            .with_project_id(ProjectId::from_optional(args.project_id.as_deref()))
            .with_platform(args.platform.unwrap_or(self.default_platform));

        self.deployer.deploy(request).await
    }
}

fn decode_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|err| DeployError::invalid_input(format!("invalid tool arguments: {err}")))
}

fn failure(prefix: &str, err: &DeployError) -> ToolResponse {
    tracing::error!(kind = err.kind(), error = %err, "{}", prefix);
    ToolResponse::error(format!("{}: {}", prefix, err))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| format!("<unserializable: {err}>"))
}
