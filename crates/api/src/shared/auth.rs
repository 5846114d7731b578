use crate::error::NoShowError;
use actix_web::HttpRequest;
use noshow_infra::NoShowContext;

/// Guards the dispatch trigger and the tenant administration routes with the
/// shared bearer secret. Every caller is let through when no secret is configured.
pub fn protect_admin_route(req: &HttpRequest, ctx: &NoShowContext) -> Result<(), NoShowError> {
    let secret = match &ctx.config.dispatch_secret {
        Some(secret) => secret,
        None => return Ok(()),
    };

    let token = req
        .headers()
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim);

    match token {
        Some(token) if token == secret => Ok(()),
        Some(_) => Err(NoShowError::Unauthorized(
            "The provided bearer token is not valid".into(),
        )),
        None => Err(NoShowError::Unauthorized(
            "Unable to find the bearer token in the authorization header".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn ctx_with_secret(secret: Option<&str>) -> NoShowContext {
        let mut ctx = NoShowContext::create_inmemory();
        ctx.config.dispatch_secret = secret.map(String::from);
        ctx
    }

    #[test]
    fn allows_everyone_without_a_configured_secret() {
        let req = TestRequest::default().to_http_request();
        assert!(protect_admin_route(&req, &ctx_with_secret(None)).is_ok());
    }

    #[test]
    fn checks_the_bearer_token() {
        let ctx = ctx_with_secret(Some("s3cret"));

        let req = TestRequest::default()
            .insert_header(("authorization", "Bearer s3cret"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_ok());

        let req = TestRequest::default()
            .insert_header(("authorization", "Bearer wrong"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());

        let req = TestRequest::default().to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());
    }
}
