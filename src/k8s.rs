use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{ContainerStatus, Pod, PodStatus};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, ResourceExt};
use std::path::PathBuf;
use tracing::debug;

use crate::model::{ContainerState, PodSummary};

#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: Option<String>,
}

#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
    context: String,
    namespace: String,
}

impl KubeGateway {
    pub async fn connect(options: &ConnectOptions) -> Result<Self> {
        let kubeconfig = match options.kubeconfig.as_ref() {
            Some(path) => Some(
                Kubeconfig::read_from(path)
                    .with_context(|| format!("failed to read kubeconfig {}", path.display()))?,
            ),
            None => Kubeconfig::read().ok(),
        };
        let current_context = kubeconfig
            .as_ref()
            .and_then(|config| config.current_context.clone());

        let config = if let Some(kubeconfig) = kubeconfig {
            let kube_options = KubeConfigOptions {
                context: options.context.clone(),
                cluster: None,
                user: None,
            };
            Config::from_custom_kubeconfig(kubeconfig, &kube_options)
                .await
                .context("failed to load Kubernetes configuration")?
        } else {
            if let Some(context) = options.context.as_deref() {
                anyhow::bail!("kubeconfig not found; cannot select context '{context}'");
            }
            Config::infer()
                .await
                .context("failed to infer Kubernetes configuration")?
        };

        let namespace = options
            .namespace
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| config.default_namespace.clone());
        let context = options
            .context
            .clone()
            .or(current_context)
            .unwrap_or_else(|| "in-cluster".to_string());
        let client = Client::try_from(config).context("failed to initialize Kubernetes client")?;
        debug!("connected context={context} namespace={namespace}");

        Ok(Self {
            client,
            context,
            namespace,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub async fn list_pods(&self) -> Result<Vec<Pod>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let list = pods
            .list(&ListParams::default())
            .await
            .with_context(|| format!("failed to list pods in namespace {}", self.namespace))?;
        debug!("listed {} pods in {}", list.items.len(), self.namespace);
        Ok(list.items)
    }

    pub async fn get_pod(&self, name: &str) -> Result<Pod> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        pods.get(name)
            .await
            .with_context(|| format!("failed to fetch pod {}/{name}", self.namespace))
    }
}

pub fn pod_summary(pod: &Pod) -> PodSummary {
    let status = pod.status.as_ref();
    PodSummary {
        name: pod.name_any(),
        created_at: pod.metadata.creation_timestamp.as_ref().map(|time| time.0),
        started_at: status
            .and_then(|status| status.start_time.as_ref())
            .map(|time| time.0),
        containers: status.map(container_states).unwrap_or_default(),
    }
}

pub fn container_states(status: &PodStatus) -> Vec<ContainerState> {
    status
        .container_statuses
        .iter()
        .flatten()
        .chain(status.init_container_statuses.iter().flatten())
        .map(container_state)
        .collect()
}

// The API models the state as three optional fields; when more than one is
// set, waiting wins over running, and running over terminated.
fn container_state(container: &ContainerStatus) -> ContainerState {
    let Some(state) = container.state.as_ref() else {
        return ContainerState::Unknown;
    };

    if let Some(waiting) = state.waiting.as_ref() {
        return ContainerState::Waiting {
            reason: waiting.reason.clone().unwrap_or_default(),
        };
    }
    if state.running.is_some() {
        return ContainerState::Running;
    }
    if let Some(terminated) = state.terminated.as_ref() {
        return ContainerState::Terminated {
            exit_code: terminated.exit_code,
        };
    }

    ContainerState::Unknown
}
