// Handlers for the blog routes, mounted under `/api/v1/blog` behind JWT auth
pub mod blog;
