//! Authentication Module
//!
//! 身份由外部认证服务签发的 JWT 携带：`{user_id, role, company_id}`。
//! 本模块只做令牌验证、角色检查和公司隔离所需的上下文提取；
//! 凭证存储和会话管理都在外部认证服务。

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{require_admin, require_auth, require_hr};
