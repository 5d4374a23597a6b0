use coleta_core::{
    Category, CategoryId, Command, Coordinate, Failure, FailureKind, LocationDenial, LocationFix,
    MapArea, Municipality, NoticeLevel, Outcome, Point, PointId, PointQuery, Region, Request,
    Response, Route, Screen, Session, Ticket,
};

fn region(code: &str) -> Region {
    Region::new(code).unwrap()
}

fn municipality_ticket(commands: &[Command]) -> (coleta_core::MountId, Ticket<Region>) {
    commands
        .iter()
        .find_map(|command| match &command.request {
            Request::Municipalities(ticket) => Some((command.mount, ticket.clone())),
            _ => None,
        })
        .unwrap()
}

fn search_ticket(commands: &[Command]) -> (coleta_core::MountId, Ticket<PointQuery>) {
    commands
        .iter()
        .find_map(|command| match &command.request {
            Request::Points(ticket) => Some((command.mount, ticket.clone())),
            _ => None,
        })
        .unwrap()
}

fn categories() -> Vec<Category> {
    [(1, "Lâmpadas"), (2, "Pilhas e Baterias"), (3, "Papéis e Papelão")]
        .into_iter()
        .map(|(id, title)| Category {
            id: CategoryId(id),
            title: title.to_owned(),
            icon_ref: format!("http://localhost:3333/uploads/{id}.svg"),
        })
        .collect()
}

fn point(id: u64) -> Point {
    Point {
        id: PointId(id),
        name: format!("Mercado {id}"),
        image_ref: "http://localhost:3333/uploads/market.jpg".to_owned(),
        coordinate: Coordinate::new(-20.948, -48.479),
    }
}

/// Drives the home screen to a complete selection and confirms it.
fn open_points(session: &mut Session) -> Vec<Command> {
    let home_mount = session.current_mount();
    session.apply(Outcome {
        mount: home_mount,
        response: Response::Regions(Ok(vec![region("SP"), region("RJ")])),
    });
    let (mount, ticket) = municipality_ticket(&session.select_region(region("SP")));
    session.apply(Outcome {
        mount,
        response: Response::Municipalities(ticket, Ok(vec![Municipality::new("Bebedouro")])),
    });
    assert!(session.select_municipality(Municipality::new("Bebedouro")));
    session.confirm()
}

#[test]
fn start_mounts_home_and_requests_regions() {
    let (session, commands) = Session::start();
    assert!(matches!(session.current(), Screen::Home(_)));
    assert_eq!(commands.len(), 1);
    assert_eq!(commands.first().map(|command| &command.request), Some(&Request::Regions));
}

#[test]
fn sp_then_rj_applies_rj_municipalities_only() {
    let (mut session, commands) = Session::start();
    let home = commands.first().unwrap().mount;
    session.apply(Outcome {
        mount: home,
        response: Response::Regions(Ok(vec![region("SP"), region("RJ")])),
    });

    let (_, sp) = municipality_ticket(&session.select_region(region("SP")));
    assert_eq!(sp.key(), &region("SP"));
    let (_, rj) = municipality_ticket(&session.select_region(region("RJ")));

    // RJ answers first, SP's late answer must not replace it.
    assert!(session.apply(Outcome {
        mount: home,
        response: Response::Municipalities(rj, Ok(vec![Municipality::new("Niterói")])),
    }));
    assert!(!session.apply(Outcome {
        mount: home,
        response: Response::Municipalities(sp, Ok(vec![Municipality::new("Bebedouro")])),
    }));

    let Screen::Home(screen) = session.current() else {
        panic!("home expected");
    };
    assert_eq!(screen.view().municipalities, vec![Municipality::new("Niterói")]);
}

#[test]
fn retry_reissues_failed_municipalities_of_the_selected_region() {
    let (mut session, commands) = Session::start();
    let home = commands.first().unwrap().mount;
    session.apply(Outcome {
        mount: home,
        response: Response::Regions(Ok(vec![region("SP")])),
    });
    let (_, failed) = municipality_ticket(&session.select_region(region("SP")));
    session.apply(Outcome {
        mount: home,
        response: Response::Municipalities(
            failed,
            Err(Failure::new(FailureKind::Network, "offline")),
        ),
    });

    let retried = session.retry();
    assert_eq!(retried.len(), 1);
    let (mount, ticket) = municipality_ticket(&retried);
    assert_eq!(mount, home);
    assert_eq!(ticket.key(), &region("SP"));
    assert!(session.retry().is_empty());

    assert!(session.apply(Outcome {
        mount: home,
        response: Response::Municipalities(ticket, Ok(vec![Municipality::new("Bebedouro")])),
    }));
    assert!(session.select_municipality(Municipality::new("Bebedouro")));
}

#[test]
fn confirm_does_not_navigate_until_selection_is_complete() {
    let (mut session, _) = Session::start();
    assert!(session.confirm().is_empty());
    assert_eq!(session.depth(), 1);

    let (mount, ticket) = municipality_ticket(&session.select_region(region("SP")));
    assert!(session.confirm().is_empty());
    assert_eq!(session.depth(), 1);

    session.apply(Outcome {
        mount,
        response: Response::Municipalities(ticket, Ok(vec![Municipality::new("Bebedouro")])),
    });
    session.select_municipality(Municipality::new("Bebedouro"));
    let commands = session.confirm();
    assert_eq!(session.depth(), 2);
    assert_eq!(commands.len(), 3);

    let Screen::Points(points) = session.current() else {
        panic!("points expected");
    };
    assert_eq!(points.destination().region, region("SP"));
    assert_eq!(points.destination().municipality, Municipality::new("Bebedouro"));
}

#[test]
fn permission_denied_keeps_filter_working() {
    let (mut session, _) = Session::start();
    let commands = open_points(&mut session);
    let mount = session.current_mount();
    let (_, initial) = search_ticket(&commands);

    session.apply(Outcome {
        mount,
        response: Response::Location(LocationFix::Denied(LocationDenial::PermissionDenied)),
    });
    session.apply(Outcome {
        mount,
        response: Response::Categories(Ok(categories())),
    });
    session.apply(Outcome {
        mount,
        response: Response::Points(initial, Ok(vec![point(1)])),
    });

    let toggled = session.toggle_category(CategoryId(1));
    assert_eq!(toggled.len(), 1);

    let Screen::Points(points) = session.current() else {
        panic!("points expected");
    };
    let view = points.view();
    assert_eq!(view.map, MapArea::Absent);
    assert!(view.filter_enabled);
    assert!(view.chips.iter().any(|chip| chip.id == CategoryId(1) && chip.selected));
    assert_eq!(
        view.notices.first().map(|notice| notice.level),
        Some(NoticeLevel::Modal)
    );
}

#[test]
fn toggled_categories_drive_the_query() {
    let (mut session, _) = Session::start();
    open_points(&mut session);

    session.toggle_category(CategoryId(1));
    let (_, ticket) = search_ticket(&session.toggle_category(CategoryId(3)));

    assert_eq!(ticket.key().categories, vec![CategoryId(1), CategoryId(3)]);
    let Screen::Points(points) = session.current() else {
        panic!("points expected");
    };
    assert!(points.filter().is_selected(CategoryId(1)));
    assert!(!points.filter().is_selected(CategoryId(2)));
    assert!(points.filter().is_selected(CategoryId(3)));
}

#[test]
fn outcomes_for_unmounted_screens_are_dropped() {
    let (mut session, _) = Session::start();
    let commands = open_points(&mut session);
    let (mount, ticket) = search_ticket(&commands);

    assert!(session.back());
    assert!(!session.is_mounted(mount));
    assert!(!session.apply(Outcome {
        mount,
        response: Response::Points(ticket, Ok(vec![point(1)])),
    }));
    assert!(matches!(session.current(), Screen::Home(_)));
    assert!(!session.back());
}

#[test]
fn reopening_points_gets_a_fresh_mount() {
    let (mut session, _) = Session::start();
    open_points(&mut session);
    let first = session.current_mount();
    session.back();

    let commands = session.confirm();
    let second = session.current_mount();
    assert_ne!(first, second);
    assert!(commands.iter().all(|command| command.mount == second));
}

#[test]
fn point_detail_flow() {
    let (mut session, _) = Session::start();
    let commands = open_points(&mut session);
    let (points_mount, ticket) = search_ticket(&commands);
    session.apply(Outcome {
        mount: points_mount,
        response: Response::Location(LocationFix::Resolved(Coordinate::new(-20.9, -48.4))),
    });
    session.apply(Outcome {
        mount: points_mount,
        response: Response::Points(ticket, Ok(vec![point(5)])),
    });

    let commands = session.open_point(PointId(5));
    assert_eq!(
        commands.first().map(|command| &command.request),
        Some(&Request::PointDetail(PointId(5)))
    );
    let detail_mount = session.current_mount();

    session.apply(Outcome {
        mount: detail_mount,
        response: Response::PointDetail(
            PointId(5),
            Err(Failure::new(FailureKind::NotFound, "Point not found")),
        ),
    });
    let Screen::Detail(detail) = session.current() else {
        panic!("detail expected");
    };
    assert_eq!(
        detail.detail().failure().map(|failure| failure.kind),
        Some(FailureKind::NotFound)
    );

    // Points screen stays mounted below the detail screen.
    assert!(session.is_mounted(points_mount));
    session.navigate(Route::Home);
    assert_eq!(session.depth(), 1);
    assert!(!session.is_mounted(points_mount));
}

#[test]
fn mismatched_outcome_is_ignored() {
    let (mut session, commands) = Session::start();
    let home = commands.first().unwrap().mount;
    assert!(!session.apply(Outcome {
        mount: home,
        response: Response::Location(LocationFix::Pending),
    }));
}
