use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coleta_core::{
    BackendPlugin, Category, CategoryId, CategoryPort, ColetaService, Collaborators,
    ConfiguredLocation, Coordinate, Dispatcher, LocalityPlugin, LocationFix, Municipality,
    MunicipalityPort, Outcome, PermissionStatus, Point, PointDetail, PointId, PointPort,
    PointQuery, PortError, Region, RegionPort, Request, Response, Screen, Session,
};
use tokio::sync::{oneshot, Mutex as AsyncMutex};

/// Locality fake whose municipality answers can be held back per region.
#[derive(Default)]
struct GatedLocality {
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl GatedLocality {
    fn hold(&self, code: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.lock().unwrap().insert(code.to_owned(), gate);
        release
    }
}

#[async_trait]
impl RegionPort for GatedLocality {
    async fn regions(&self) -> Result<Vec<Region>, PortError> {
        Ok(vec![Region::new("SP").unwrap(), Region::new("RJ").unwrap()])
    }
}

#[async_trait]
impl MunicipalityPort for GatedLocality {
    async fn municipalities(&self, region: &Region) -> Result<Vec<Municipality>, PortError> {
        let gate = self.gates.lock().unwrap().remove(&region.code);
        if let Some(gate) = gate
            && gate.await.is_err()
        {
            return Err(PortError::Internal("gate dropped".to_owned()));
        }
        let names: &[&str] = match region.code.as_str() {
            "SP" => &["Bebedouro", "Barretos"],
            "RJ" => &["Niterói"],
            _ => &[],
        };
        Ok(names.iter().map(|name| Municipality::new(*name)).collect())
    }
}

/// Backend fake recording every query it receives.
#[derive(Default)]
struct RecordingBackend {
    queries: AsyncMutex<Vec<PointQuery>>,
}

#[async_trait]
impl CategoryPort for RecordingBackend {
    async fn categories(&self) -> Result<Vec<Category>, PortError> {
        Ok((1..=3)
            .map(|id| Category {
                id: CategoryId(id),
                title: format!("Category {id}"),
                icon_ref: String::new(),
            })
            .collect())
    }
}

#[async_trait]
impl PointPort for RecordingBackend {
    async fn search(&self, query: &PointQuery) -> Result<Vec<Point>, PortError> {
        self.queries.lock().await.push(query.clone());
        Ok(vec![Point {
            id: PointId(1),
            name: "Mercado".to_owned(),
            image_ref: String::new(),
            coordinate: Coordinate::new(-20.9, -48.4),
        }])
    }

    async fn detail(&self, _id: PointId) -> Result<PointDetail, PortError> {
        Err(PortError::PointNotFound)
    }
}

fn service(
    locality: Arc<GatedLocality>,
    backend: Arc<RecordingBackend>,
    permission: PermissionStatus,
) -> Arc<ColetaService> {
    let collaborators = Collaborators::new(
        LocalityPlugin {
            region_port: locality.clone(),
            municipality_port: locality,
        },
        BackendPlugin {
            category_port: backend.clone(),
            point_port: backend,
        },
        Arc::new(ConfiguredLocation::new(
            permission,
            Some(Coordinate::new(-20.94, -48.47)),
        )),
    );
    Arc::new(ColetaService::new(Arc::new(collaborators)))
}

#[tokio::test]
async fn late_municipality_answer_for_previous_region_is_discarded() {
    let locality = Arc::new(GatedLocality::default());
    let release_sp = locality.hold("SP");
    let (dispatcher, mut outcomes) = Dispatcher::channel(service(
        locality,
        Arc::new(RecordingBackend::default()),
        PermissionStatus::Granted,
    ));

    let (mut session, commands) = Session::start();
    dispatcher.dispatch_all(commands);
    let regions = outcomes.recv().await.unwrap();
    assert!(session.apply(regions));

    dispatcher.dispatch_all(session.select_region(Region::new("SP").unwrap()));
    dispatcher.dispatch_all(session.select_region(Region::new("RJ").unwrap()));

    let first: Outcome = outcomes.recv().await.unwrap();
    assert!(matches!(
        &first.response,
        Response::Municipalities(ticket, _) if ticket.key().code == "RJ"
    ));
    assert!(session.apply(first));

    release_sp.send(()).unwrap();
    let late = outcomes.recv().await.unwrap();
    assert!(!session.apply(late));

    let Screen::Home(home) = session.current() else {
        panic!("home expected");
    };
    assert_eq!(home.view().municipalities, vec![Municipality::new("Niterói")]);
}

#[tokio::test]
async fn points_screen_sources_resolve_through_the_dispatcher() {
    let backend = Arc::new(RecordingBackend::default());
    let (dispatcher, mut outcomes) = Dispatcher::channel(service(
        Arc::new(GatedLocality::default()),
        backend.clone(),
        PermissionStatus::Granted,
    ));

    let (mut session, _) = Session::start();
    let points = session.navigate(coleta_core::Route::Points(coleta_core::Destination {
        region: Region::new("SP").unwrap(),
        municipality: Municipality::new("Bebedouro"),
    }));
    let issued = points.len();
    dispatcher.dispatch_all(points);
    for _ in 0..issued {
        let outcome = outcomes.recv().await.unwrap();
        session.apply(outcome);
    }

    let Screen::Points(screen) = session.current() else {
        panic!("points expected");
    };
    assert_eq!(
        screen.location(),
        LocationFix::Resolved(Coordinate::new(-20.94, -48.47))
    );
    assert_eq!(screen.view().chips.len(), 3);
    assert_eq!(screen.view().points.len(), 1);

    let queries = backend.queries.lock().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries.first().and_then(PointQuery::items_param), None);
}

#[tokio::test]
async fn denied_permission_resolves_without_coordinate() {
    let (dispatcher, mut outcomes) = Dispatcher::channel(service(
        Arc::new(GatedLocality::default()),
        Arc::new(RecordingBackend::default()),
        PermissionStatus::Denied,
    ));
    let (mut session, _) = Session::start();
    let commands = session.navigate(coleta_core::Route::Points(coleta_core::Destination {
        region: Region::new("SP").unwrap(),
        municipality: Municipality::new("Bebedouro"),
    }));
    let location = commands
        .into_iter()
        .find(|command| command.request == Request::Location)
        .unwrap();
    dispatcher.dispatch(location);

    let outcome = outcomes.recv().await.unwrap();
    assert!(matches!(outcome.response, Response::Location(LocationFix::Denied(_))));
    assert!(session.apply(outcome));
}
