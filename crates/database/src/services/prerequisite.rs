use crate::{
    entities::{course_prerequisites, courses},
    error::ServiceError,
    locks,
};
use chrono::Utc;
use log::{debug, info, warn};
use models::{caller::Caller, reachability::Traversal};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

pub struct PrerequisiteService;

impl PrerequisiteService {
    /// Whether `course -> prerequisite` could be added right now
    pub async fn can_add_edge<C>(
        conn: &C,
        course: Uuid,
        prerequisite: Uuid,
    ) -> Result<bool, ServiceError>
    where
        C: ConnectionTrait,
    {
        match Self::check_edge(conn, course, prerequisite).await {
            Ok(()) => Ok(true),
            Err(ServiceError::DuplicateEdge { .. } | ServiceError::DependencyConflict { .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Adds `course -> prerequisite` after checking it keeps the graph acyclic.
    ///
    /// The check and the insert share one transaction holding the graph lock,
    /// so concurrent insertions cannot jointly close a cycle.
    pub async fn validate_and_create_edge(
        db: &DatabaseConnection,
        caller: &Caller,
        course: Uuid,
        prerequisite: Uuid,
    ) -> Result<course_prerequisites::Model, ServiceError> {
        Self::authorize(caller)?;

        let txn = db.begin().await?;
        locks::lock_prerequisite_graph(&txn).await?;

        for id in [course, prerequisite] {
            courses::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(ServiceError::not_found("course", id))?;
        }

        if let Err(e) = Self::check_edge(&txn, course, prerequisite).await {
            warn!("Rejected prerequisite {course} -> {prerequisite}: {e}");
            return Err(e);
        }

        let edge = course_prerequisites::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course),
            prerequisite_id: Set(prerequisite),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "{} added prerequisite {prerequisite} to course {course}",
            caller.subject
        );
        Ok(edge)
    }

    /// Removes `course -> prerequisite`. Removing an edge never creates a cycle.
    pub async fn remove_edge(
        db: &DatabaseConnection,
        caller: &Caller,
        course: Uuid,
        prerequisite: Uuid,
    ) -> Result<(), ServiceError> {
        Self::authorize(caller)?;

        let result = course_prerequisites::Entity::delete_many()
            .filter(course_prerequisites::Column::CourseId.eq(course))
            .filter(course_prerequisites::Column::PrerequisiteId.eq(prerequisite))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound {
                entity: "prerequisite edge",
                id: prerequisite,
            });
        }

        info!(
            "{} removed prerequisite {prerequisite} from course {course}",
            caller.subject
        );
        Ok(())
    }

    pub async fn has_prerequisites<C>(conn: &C, course: Uuid) -> Result<bool, ServiceError>
    where
        C: ConnectionTrait,
    {
        let count = course_prerequisites::Entity::find()
            .filter(course_prerequisites::Column::CourseId.eq(course))
            .count(conn)
            .await?;

        Ok(count > 0)
    }

    /// Whether any course lists `course` as a prerequisite
    pub async fn is_prerequisite_for<C>(conn: &C, course: Uuid) -> Result<bool, ServiceError>
    where
        C: ConnectionTrait,
    {
        let count = course_prerequisites::Entity::find()
            .filter(course_prerequisites::Column::PrerequisiteId.eq(course))
            .count(conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn direct_prerequisites<C>(
        conn: &C,
        course: Uuid,
    ) -> Result<Vec<courses::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let ids: Vec<Uuid> = course_prerequisites::Entity::find()
            .select_only()
            .column(course_prerequisites::Column::PrerequisiteId)
            .filter(course_prerequisites::Column::CourseId.eq(course))
            .into_tuple()
            .all(conn)
            .await?;

        Self::courses_by_ids(conn, ids).await
    }

    /// Courses that list `course` as a direct prerequisite
    pub async fn dependents<C>(conn: &C, course: Uuid) -> Result<Vec<courses::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let ids: Vec<Uuid> = course_prerequisites::Entity::find()
            .select_only()
            .column(course_prerequisites::Column::CourseId)
            .filter(course_prerequisites::Column::PrerequisiteId.eq(course))
            .into_tuple()
            .all(conn)
            .await?;

        Self::courses_by_ids(conn, ids).await
    }

    /// Every course that must be taken before `course`, at any depth
    pub async fn all_prerequisites<C>(
        conn: &C,
        course: Uuid,
    ) -> Result<Vec<courses::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let traversal = Self::explore(conn, course, None).await?;
        let ids: Vec<Uuid> = traversal.discovered().copied().collect();

        Self::courses_by_ids(conn, ids).await
    }

    /// Rejects duplicates and any edge that would close a cycle
    async fn check_edge<C>(conn: &C, course: Uuid, prerequisite: Uuid) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let existing = course_prerequisites::Entity::find()
            .filter(course_prerequisites::Column::CourseId.eq(course))
            .filter(course_prerequisites::Column::PrerequisiteId.eq(prerequisite))
            .count(conn)
            .await?;

        if existing > 0 {
            return Err(ServiceError::DuplicateEdge {
                course,
                prerequisite,
            });
        }

        // course -> prerequisite closes a cycle iff course is already reachable from
        // prerequisite. This includes the self-edge, since the origin counts as reached.
        let traversal = Self::explore(conn, prerequisite, Some(course)).await?;
        if traversal.has_reached(&course) {
            return Err(ServiceError::DependencyConflict {
                course,
                prerequisite,
            });
        }

        Ok(())
    }

    /// Walks `X -> Y` edges breadth-first from `origin`, one batched query per level.
    /// Stops early once `target` is reached.
    async fn explore<C>(
        conn: &C,
        origin: Uuid,
        target: Option<Uuid>,
    ) -> Result<Traversal<Uuid>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut traversal = Traversal::new(origin);
        let mut depth = 0;

        while !traversal.is_exhausted() {
            if target.is_some_and(|target| traversal.has_reached(&target)) {
                break;
            }

            let edges: Vec<(Uuid, Uuid)> = course_prerequisites::Entity::find()
                .select_only()
                .column(course_prerequisites::Column::CourseId)
                .column(course_prerequisites::Column::PrerequisiteId)
                .filter(
                    course_prerequisites::Column::CourseId.is_in(traversal.frontier().to_vec()),
                )
                .into_tuple()
                .all(conn)
                .await?;

            depth += 1;
            debug!(
                "Prerequisite traversal from {origin}: depth {depth}, {} edge(s)",
                edges.len()
            );
            traversal.advance(edges);
        }

        Ok(traversal)
    }

    async fn courses_by_ids<C>(conn: &C, ids: Vec<Uuid>) -> Result<Vec<courses::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let courses = courses::Entity::find()
            .filter(courses::Column::Id.is_in(ids))
            .order_by_asc(courses::Column::Code)
            .all(conn)
            .await?;

        Ok(courses)
    }

    fn authorize(caller: &Caller) -> Result<(), ServiceError> {
        if caller.can_manage_catalog() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} may not change prerequisites",
                caller.subject
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_course, registrar, setup_db, student};

    async fn edge_count(db: &DatabaseConnection) -> u64 {
        course_prerequisites::Entity::find().count(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_reverse_edge_is_a_dependency_conflict() {
        let db = setup_db().await;
        let caller = registrar();
        let a = insert_course(&db, "A", 3).await.id;
        let b = insert_course(&db, "B", 3).await.id;

        PrerequisiteService::validate_and_create_edge(&db, &caller, b, a)
            .await
            .unwrap();

        let result = PrerequisiteService::validate_and_create_edge(&db, &caller, a, b).await;
        assert!(matches!(
            result,
            Err(ServiceError::DependencyConflict { course, prerequisite }) if course == a && prerequisite == b
        ));

        let edges = course_prerequisites::Entity::find().all(&db).await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].course_id, edges[0].prerequisite_id), (b, a));
    }

    #[tokio::test]
    async fn test_long_cycles_are_detected() {
        let db = setup_db().await;
        let caller = registrar();
        let a = insert_course(&db, "A", 3).await.id;
        let b = insert_course(&db, "B", 3).await.id;
        let c = insert_course(&db, "C", 3).await.id;
        let d = insert_course(&db, "D", 3).await.id;

        // A -> B -> C -> D
        for (course, prerequisite) in [(a, b), (b, c), (c, d)] {
            PrerequisiteService::validate_and_create_edge(&db, &caller, course, prerequisite)
                .await
                .unwrap();
        }

        assert!(!PrerequisiteService::can_add_edge(&db, d, a).await.unwrap());
        assert!(!PrerequisiteService::can_add_edge(&db, c, a).await.unwrap());
        let result = PrerequisiteService::validate_and_create_edge(&db, &caller, d, a).await;
        assert!(matches!(
            result,
            Err(ServiceError::DependencyConflict { .. })
        ));

        // A shortcut along the existing direction is fine
        assert!(PrerequisiteService::can_add_edge(&db, a, d).await.unwrap());
        assert_eq!(edge_count(&db).await, 3);
    }

    #[tokio::test]
    async fn test_self_edge_is_rejected() {
        let db = setup_db().await;
        let a = insert_course(&db, "A", 3).await.id;

        let result = PrerequisiteService::validate_and_create_edge(&db, &registrar(), a, a).await;

        assert!(matches!(
            result,
            Err(ServiceError::DependencyConflict { .. })
        ));
        assert_eq!(edge_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_edge_is_rejected() {
        let db = setup_db().await;
        let caller = registrar();
        let a = insert_course(&db, "A", 3).await.id;
        let b = insert_course(&db, "B", 3).await.id;

        PrerequisiteService::validate_and_create_edge(&db, &caller, a, b)
            .await
            .unwrap();
        let second = PrerequisiteService::validate_and_create_edge(&db, &caller, a, b).await;

        assert!(matches!(second, Err(ServiceError::DuplicateEdge { .. })));
        assert_eq!(edge_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_queries_and_removal() {
        let db = setup_db().await;
        let caller = registrar();
        let calc2 = insert_course(&db, "MATH201", 4).await.id;
        let calc1 = insert_course(&db, "MATH101", 4).await.id;
        let algebra = insert_course(&db, "MATH050", 3).await.id;

        PrerequisiteService::validate_and_create_edge(&db, &caller, calc2, calc1)
            .await
            .unwrap();
        PrerequisiteService::validate_and_create_edge(&db, &caller, calc1, algebra)
            .await
            .unwrap();

        assert!(PrerequisiteService::has_prerequisites(&db, calc2).await.unwrap());
        assert!(!PrerequisiteService::has_prerequisites(&db, algebra).await.unwrap());
        assert!(PrerequisiteService::is_prerequisite_for(&db, algebra).await.unwrap());
        assert!(!PrerequisiteService::is_prerequisite_for(&db, calc2).await.unwrap());

        let direct = PrerequisiteService::direct_prerequisites(&db, calc2)
            .await
            .unwrap();
        assert_eq!(direct.iter().map(|c| c.id).collect::<Vec<_>>(), vec![calc1]);

        let all = PrerequisiteService::all_prerequisites(&db, calc2)
            .await
            .unwrap();
        let codes: Vec<&str> = all.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["MATH050", "MATH101"]);

        let dependents = PrerequisiteService::dependents(&db, calc1).await.unwrap();
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].id, calc2);

        PrerequisiteService::remove_edge(&db, &caller, calc2, calc1)
            .await
            .unwrap();
        assert!(!PrerequisiteService::has_prerequisites(&db, calc2).await.unwrap());
        assert!(matches!(
            PrerequisiteService::remove_edge(&db, &caller, calc2, calc1).await,
            Err(ServiceError::NotFound { .. })
        ));

        // With the edge gone the reverse direction is acceptable again
        assert!(PrerequisiteService::can_add_edge(&db, calc1, calc2).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_course_and_unauthorized_caller() {
        let db = setup_db().await;
        let a = insert_course(&db, "A", 3).await.id;

        let missing =
            PrerequisiteService::validate_and_create_edge(&db, &registrar(), a, Uuid::new_v4())
                .await;
        assert!(matches!(
            missing,
            Err(ServiceError::NotFound { entity: "course", .. })
        ));

        let b = insert_course(&db, "B", 3).await.id;
        let forbidden = PrerequisiteService::validate_and_create_edge(&db, &student(), a, b).await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));
        assert_eq!(edge_count(&db).await, 0);
    }

    // The single-connection pool serializes the two transactions here; the
    // Postgres advisory lock statements are checked in `locks::tests`
    #[tokio::test]
    async fn test_racing_reverse_edges_cannot_both_commit() {
        let db = setup_db().await;
        let caller = registrar();
        let a = insert_course(&db, "A", 3).await.id;
        let b = insert_course(&db, "B", 3).await.id;

        let (first, second) = tokio::join!(
            PrerequisiteService::validate_and_create_edge(&db, &caller, a, b),
            PrerequisiteService::validate_and_create_edge(&db, &caller, b, a),
        );

        assert!(first.is_ok() != second.is_ok());
        assert_eq!(edge_count(&db).await, 1);
    }
}
