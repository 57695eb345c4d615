use actix_cors::Cors;
use actix_web::{
    error::{InternalError, JsonPayloadError},
    get,
    http::header,
    middleware::{self, Condition},
    post,
    web::{self, Data},
    App, Either, HttpRequest, HttpResponse, HttpResponseBuilder, HttpServer, Responder,
};
use actix_web_lab::respond::Html;
use clap::{Parser, ValueEnum};
use database::{
    consts::consts::DEFAULT_MONGO_URI,
    gateway::{
        options::{StorageEngine, StorageOptions},
        store::{open_store, PersonStore},
    },
};
use juniper::{
    http::{graphiql::graphiql_source, GraphQLRequest},
    InputValue,
};
use serde::Deserialize;
use std::{io, sync::Arc};

use crate::{
    operation::{selected_operation, OperationKind},
    schema::{create_schema, GraphQLContext, Schema},
};

mod operation;
mod schema;

const GRAPHQL_PATH: &str = "/amigos";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GraphQLQueryParams {
    query: Option<String>,
    operation_name: Option<String>,
    /// JSON encoded variables
    variables: Option<String>,
}

impl GraphQLQueryParams {
    fn into_request(self, query: String) -> Result<GraphQLRequest, serde_json::Error> {
        let variables = self
            .variables
            .map(|v| serde_json::from_str::<InputValue>(&v))
            .transpose()?;

        Ok(GraphQLRequest::new(query, self.operation_name, variables))
    }
}

/// Error response shaped like a GraphQL result, for requests rejected before execution
fn graphql_error(mut builder: HttpResponseBuilder, message: impl Into<String>) -> HttpResponse {
    builder.json(serde_json::json!({ "errors": [{ "message": message.into() }] }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = graphql_error(
        HttpResponse::BadRequest(),
        format!("POST body sent invalid JSON: {}", err),
    );

    InternalError::from_response(err, response).into()
}

async fn execute(
    schema: &Schema,
    store: Arc<dyn PersonStore>,
    request: GraphQLRequest,
) -> HttpResponse {
    let graphql_context = GraphQLContext { store };

    let response = request.execute(schema, &graphql_context).await;

    // Requests rejected during parsing or validation never reached a resolver
    let mut builder = if response.is_ok() {
        HttpResponse::Ok()
    } else {
        HttpResponse::BadRequest()
    };

    builder.json(response)
}

/// GraphiQL playground UI, or query execution when `?query=` is present
#[get("/amigos")]
async fn graphql_get(
    schema: web::Data<Schema>,
    store: web::Data<dyn PersonStore>,
    params: web::Query<GraphQLQueryParams>,
) -> impl Responder {
    let mut params = params.into_inner();

    let query = match params.query.take() {
        Some(query) => query,
        None => return Either::Left(Html(graphiql_source(GRAPHQL_PATH, None))),
    };

    // GET requests must not write, they are reachable cross-site
    if selected_operation(&query, params.operation_name.as_deref())
        == Some(OperationKind::Mutation)
    {
        let mut builder = HttpResponse::MethodNotAllowed();
        builder.insert_header((header::ALLOW, "POST"));

        return Either::Right(graphql_error(
            builder,
            "Can only perform a mutation operation from a POST request.",
        ));
    }

    let request = match params.into_request(query) {
        Ok(request) => request,
        Err(err) => {
            return Either::Right(graphql_error(
                HttpResponse::BadRequest(),
                format!("Variables are invalid JSON: {}", err),
            ))
        }
    };

    Either::Right(execute(&schema, store.into_inner(), request).await)
}

/// GraphQL endpoint -- triggered once per request
#[post("/amigos")]
async fn graphql_post(
    schema: web::Data<Schema>,
    store: web::Data<dyn PersonStore>,
    data: web::Json<GraphQLRequest>,
) -> impl Responder {
    execute(&schema, store.into_inner(), data.into_inner()).await
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(graphql_get)
        .service(graphql_post);
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum StorageKind {
    Mongo,
    /// Keeps people in process memory, useful for trying the API without a database
    Memory,
}

/// 👫 Amigos GraphQL Server, stores people in MongoDB and serves them over GraphQL
#[derive(Parser, Debug)]
struct Cli {
    /// Port the graphql server will run on
    #[clap(short, long, default_value = "3001")]
    port: u16,

    /// Address the graphql server will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// MongoDB connection string, the database named in the path is used
    #[clap(long, default_value = DEFAULT_MONGO_URI)]
    mongo_uri: String,

    #[clap(long, value_enum, default_value_t = StorageKind::Mongo)]
    storage: StorageKind,

    /// Log every HTTP request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 1)]
    http_workers: usize,
}

impl Cli {
    fn storage_options(&self) -> StorageOptions {
        let storage_engine = match self.storage {
            StorageKind::Mongo => StorageEngine::Mongo(self.mongo_uri.clone()),
            StorageKind::Memory => StorageEngine::Memory,
        };

        StorageOptions::default().set_storage_engine(storage_engine)
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    // Connection failures leave the store degraded, the server still starts
    let store = open_store(args.storage_options()).await;

    // Create Juniper schema
    let schema = Arc::new(create_schema());

    log::info!("starting HTTP server on port {}.", args.port);

    log::info!(
        "GraphiQL playground: http://{}:{}{}",
        args.address,
        args.port,
        GRAPHQL_PATH
    );

    let log_http = args.log_http;

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(Data::from(schema.clone()))
            .app_data(Data::from(store.clone()))
            .configure(routes)
            .wrap(Cors::permissive())
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await
}
