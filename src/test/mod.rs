
mod routes;
