mod pagination;
mod user;
