use std::sync::Arc;

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use curio_core::AppError;
use curio_db::UserRepository;
use rand_core::OsRng;

use crate::context::InstallContext;
use crate::result::InstallResult;
use crate::task::{InstallTask, TaskVars};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Creates the first global administrator
#[derive(Default)]
pub struct CreateFirstUserTask {
    context: Option<Arc<InstallContext>>,
    vars: TaskVars,
}

impl CreateFirstUserTask {
    pub const ID: &'static str = "create_first_user";
}

/// Validated first-user variables
#[derive(Debug, PartialEq, Eq)]
struct FirstUser {
    name: String,
    email: String,
    password: String,
}

impl FirstUser {
    fn from_vars(vars: &TaskVars) -> Result<Self, AppError> {
        let field = |key: &str| -> Result<String, AppError> {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| AppError::InvalidInput(format!("The first user requires a {}.", key)))
        };

        let name = field("name")?;
        let email = field("email")?;
        let password = vars
            .get("password")
            .filter(|p| !p.is_empty())
            .cloned()
            .ok_or_else(|| AppError::InvalidInput("The first user requires a password.".to_string()))?;

        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput(format!(
                "\"{}\" is not a valid email address.",
                email
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "The password must be at least {} characters long.",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(Self {
            name,
            email,
            password,
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

#[async_trait]
impl InstallTask for CreateFirstUserTask {
    async fn perform(&mut self, result: &mut InstallResult) {
        let Some(context) = super::require_context(&self.context, Self::ID, result) else {
            return;
        };

        let user = match FirstUser::from_vars(&self.vars) {
            Ok(user) => user,
            Err(e) => {
                super::report(result, Self::ID, e);
                return;
            }
        };

        let password = user.password;
        let password_hash = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
            Ok(Ok(hash)) => hash,
            Ok(Err(e)) => {
                super::report(result, Self::ID, e);
                return;
            }
            Err(e) => {
                let e = AppError::Internal(format!("Password hashing failed: {}", e));
                super::report(result, Self::ID, e);
                return;
            }
        };

        let users = UserRepository::new(context.pool.clone(), context.table_prefix());
        match users.create_admin(&user.name, &user.email, &password_hash).await {
            Ok(id) => {
                tracing::info!(user_id = id, email = %user.email, "First user created");
                result.add_success(format!("Created the first user \"{}\".", user.email));
            }
            Err(e) => super::report(result, Self::ID, e),
        }
    }

    fn set_context(&mut self, context: Arc<InstallContext>) {
        self.context = Some(context);
    }

    fn set_vars(&mut self, vars: TaskVars) {
        self.vars = vars;
    }
}
