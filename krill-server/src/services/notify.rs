//! 通知服务
//!
//! 外部通知网关 (邮件 / 站内信) 的 fire-and-forget 客户端。
//! 通知失败只记日志，绝不让触发它的业务操作失败。
//!
//! 未配置 `NOTIFY_WEBHOOK_URL` 时降级为纯日志模式 (开发环境常态)。

use serde::Serialize;
use serde_json::Value;

/// 通知模板类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LeaveRequestSubmitted,
    LeaveRequestDecided,
    SalarySlipGenerated,
}

/// 发往通知网关的载荷
#[derive(Debug, Clone, Serialize)]
struct NotificationPayload {
    recipients: Vec<String>,
    kind: NotificationKind,
    payload: Value,
}

/// 通知服务
#[derive(Clone)]
pub struct NotificationService {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl NotificationService {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// 发送通知 (fire-and-forget)
    ///
    /// 立即返回；投递在后台任务中完成，失败只记 warn 日志。
    pub fn send(&self, recipients: Vec<String>, kind: NotificationKind, payload: Value) {
        if recipients.is_empty() {
            tracing::debug!(?kind, "Notification skipped: no recipients");
            return;
        }

        let Some(url) = self.webhook_url.clone() else {
            tracing::info!(?kind, recipients = recipients.len(), "Notification (log-only): {}", payload);
            return;
        };

        let client = self.client.clone();
        let body = NotificationPayload {
            recipients,
            kind,
            payload,
        };

        tokio::spawn(async move {
            match client.post(&url).json(&body).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(?kind, "Notification delivered");
                }
                Ok(resp) => {
                    tracing::warn!(?kind, status = %resp.status(), "Notification gateway rejected payload");
                }
                Err(e) => {
                    tracing::warn!(?kind, error = %e, "Notification delivery failed");
                }
            }
        });
    }
}
