//! Subcommands and their results.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Subcommand;
use corelib::audit::OperationRecord;
use corelib::node::{NodeDescriptor, NodeId};
use corelib::records::UserRecord;
use corelib::{Cluster, RoutedMessage, ToggleOutcome, Topology};
use replication::{distribution, ReplicaPlacement, SimpleStrategy, UserPlacement};
use serde_json::{json, Value};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the ring position (0-255) of a key.
    Position { key: String },

    /// Show which node owns a key.
    Owner { key: String },

    /// Show the replica set of a key, owner first.
    Replicas {
        key: String,

        /// Override the replica count for this lookup.
        #[arg(short, long)]
        count: Option<usize>,
    },

    /// List nodes with their ring position and ownership tallies.
    Nodes,

    /// Activate an inactive node or deactivate an active one.
    Toggle { id: u64 },

    /// Show owner and replicas for every user.
    Distribution,

    /// Show the operation log, newest first.
    Logs,

    /// Empty the operation log.
    ClearLogs,

    /// Register a user.
    AddUser { username: String, name: String },

    /// Store a message and show where its recipient routes.
    Send { from: String, to: String, text: String },
}

#[derive(Debug, Clone)]
pub enum CommandResult {
    Position { key: String, position: u16 },
    Owner { key: String, position: u16, owner: Option<NodeDescriptor> },
    Replicas(ReplicaPlacement),
    Nodes(Topology),
    Toggled(ToggleOutcome),
    Distribution(Vec<UserPlacement>),
    Logs(Vec<OperationRecord>),
    LogsCleared,
    UserAdded { user: UserRecord, owner: Option<NodeDescriptor> },
    Sent(RoutedMessage),
}

impl Command {
    /// Run against `cluster`. Replica counts default to its replication factor.
    pub async fn execute(self, cluster: &Cluster) -> Result<CommandResult> {
        let ring = cluster.ring();
        let strategy = SimpleStrategy::new(cluster.config().replication_factor);
        let result = match self {
            Command::Position { key } => CommandResult::Position {
                position: ring.position(&key).value(),
                key,
            },
            Command::Owner { key } => CommandResult::Owner {
                position: ring.position(&key).value(),
                owner: cluster.find_owner(&key),
                key,
            },
            Command::Replicas { key, count } => {
                let strategy = count.map(SimpleStrategy::new).unwrap_or(strategy);
                let nodes = cluster.nodes();
                CommandResult::Replicas(ReplicaPlacement::for_key(ring, &strategy, &key, &nodes))
            }
            Command::Nodes => CommandResult::Nodes(cluster.node_report().await?),
            Command::Toggle { id } => CommandResult::Toggled(cluster.toggle_node(NodeId(id)).await?),
            Command::Distribution => {
                let nodes = cluster.nodes();
                let users = cluster.users().await?;
                CommandResult::Distribution(distribution(ring, &strategy, &nodes, &users))
            }
            Command::Logs => CommandResult::Logs(cluster.operation_log().await?),
            Command::ClearLogs => {
                cluster.clear_operation_log().await?;
                CommandResult::LogsCleared
            }
            Command::AddUser { username, name } => {
                let user = cluster.register_user(&username, &name).await?;
                let owner = cluster.find_owner(&user.key());
                CommandResult::UserAdded { user, owner }
            }
            Command::Send { from, to, text } => {
                CommandResult::Sent(cluster.send_message(&from, &to, &text).await?)
            }
        };
        Ok(result)
    }
}

fn node_label(node: &NodeDescriptor) -> String {
    format!("{} [{}]", node.name, node.id)
}

fn owner_label(owner: Option<&NodeDescriptor>) -> String {
    owner.map_or_else(|| "unroutable (no active nodes)".to_string(), node_label)
}

fn state_label(active: bool) -> &'static str {
    if active {
        "active"
    } else {
        "inactive"
    }
}

impl CommandResult {
    pub fn to_json(&self) -> Value {
        match self {
            CommandResult::Position { key, position } => json!({"key": key, "position": position}),
            CommandResult::Owner { key, position, owner } => {
                json!({"key": key, "position": position, "owner": owner})
            }
            CommandResult::Replicas(placement) => json!(placement),
            CommandResult::Nodes(topology) => json!(topology),
            CommandResult::Toggled(outcome) => json!({
                "success": true,
                "node": outcome.node,
                "previousStatus": outcome.previous,
            }),
            CommandResult::Distribution(rows) => json!({"distribution": rows}),
            CommandResult::Logs(entries) => json!({"logs": entries}),
            CommandResult::LogsCleared => json!({"success": true}),
            CommandResult::UserAdded { user, owner } => json!({"user": user, "owner": owner}),
            CommandResult::Sent(routed) => json!({"message": routed.message, "route": routed.route}),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) -> std::fmt::Result {
        match self {
            CommandResult::Position { key, position } => writeln!(out, "{key} -> {position}"),
            CommandResult::Owner { key, position, owner } => {
                writeln!(out, "{key} (position {position}) -> {}", owner_label(owner.as_ref()))
            }
            CommandResult::Replicas(p) => {
                if p.is_unroutable() {
                    return writeln!(out, "{} (position {}) -> {}", p.key, p.position, owner_label(None));
                }
                let names: Vec<String> = p.replicas.iter().map(node_label).collect();
                writeln!(out, "{} (position {}) -> {}", p.key, p.position, names.join(", "))
            }
            CommandResult::Nodes(topology) => {
                for load in &topology.nodes {
                    writeln!(
                        out,
                        "{:<22} pos {:>3}  {:<8}  users {:>3}  messages {:>4}  {}",
                        node_label(&load.node),
                        load.position,
                        state_label(load.node.active),
                        load.owned_key_count(),
                        load.message_count,
                        load.assigned_users.join(",")
                    )?;
                }
                if !topology.unassigned.is_empty() {
                    writeln!(out, "unassigned: {}", topology.unassigned.join(","))?;
                }
                Ok(())
            }
            CommandResult::Toggled(outcome) => writeln!(
                out,
                "{}: {} -> {}",
                node_label(&outcome.node),
                state_label(outcome.previous),
                state_label(outcome.node.active)
            ),
            CommandResult::Distribution(rows) => {
                for row in rows {
                    writeln!(
                        out,
                        "{:<16} pos {:>3}  primary {:<14} replicas {}",
                        row.username,
                        row.chord_position,
                        row.primary_node.as_deref().unwrap_or("None"),
                        row.replica_nodes.join(", ")
                    )?;
                }
                Ok(())
            }
            CommandResult::Logs(entries) => {
                for entry in entries {
                    writeln!(out, "{} {} {}", entry.timestamp, entry.operation, entry.details)?;
                }
                Ok(())
            }
            CommandResult::LogsCleared => writeln!(out, "operation log cleared"),
            CommandResult::UserAdded { user, owner } => writeln!(
                out,
                "added user {} ({}) -> {}",
                user.username,
                user.name,
                owner_label(owner.as_ref())
            ),
            CommandResult::Sent(routed) => writeln!(
                out,
                "stored message {}; {} routes to {}",
                routed.message.id,
                routed.message.to,
                owner_label(routed.route.as_ref())
            ),
        }
    }
}
