use std::rc::Rc;

use crate::models::{
    error::AppError,
    selection::{Dimensions, Selection},
};
use crate::services::query::{QueryParams, shape};

/// What a consumer renders for one remote resource.
#[derive(Debug, PartialEq)]
pub enum FetchState<T> {
    /// Nothing to fetch for the current selection.
    Idle,
    Loading,
    Success(Rc<T>),
    Failure(String),
}

// Manual impl so `T` need not be `Clone`
impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Success(data) => Self::Success(Rc::clone(data)),
            Self::Failure(message) => Self::Failure(message.clone()),
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&Rc<T>> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Identity of the request that produced the data on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DatasetId(u64);

/// Ties a response to the request that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
}

impl RequestToken {
    pub fn dataset(&self) -> DatasetId {
        DatasetId(self.generation)
    }
}

/// A request the caller should issue.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub selection: Selection,
    pub params: QueryParams,
}

/// Outcome of handing a response back to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer request was issued after this one.
    Stale,
    /// The consumer was torn down.
    Disposed,
}

/// Per-consumer fetch lifecycle: `Idle -> Loading -> {Success, Failure}`.
///
/// Every selection change bumps the generation, so only the most recently
/// initiated request can be applied regardless of arrival order.
#[derive(Debug)]
pub struct FetchMachine<T> {
    state: FetchState<T>,
    dimensions: Dimensions,
    selection: Option<Selection>,
    params: Option<QueryParams>,
    generation: u64,
    dataset: DatasetId,
    disposed: bool,
}

impl<T> FetchMachine<T> {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            state: FetchState::Idle,
            dimensions,
            selection: None,
            params: None,
            generation: 0,
            dataset: DatasetId::default(),
            disposed: false,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Dataset of the last applied response.
    pub fn dataset(&self) -> DatasetId {
        self.dataset
    }

    /// Moves to a new selection.
    ///
    /// Returns the request to issue, or `None` when nothing this consumer
    /// is scoped by changed, the selection is not queryable, or the consumer
    /// is gone.
    pub fn select(&mut self, selection: &Selection) -> Option<FetchRequest> {
        if self.disposed {
            return None;
        }

        let params = shape(selection, self.dimensions);
        self.selection = Some(selection.clone());
        if self.params.as_ref() == Some(&params) {
            return None;
        }
        self.params = Some(params);
        self.issue()
    }

    /// Re-issues the current selection on explicit user request.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        if self.disposed || self.selection.is_none() {
            return None;
        }
        self.issue()
    }

    /// Applies a response if it belongs to the latest request.
    pub fn resolve(&mut self, token: RequestToken, result: Result<T, AppError>) -> Resolution {
        if self.disposed {
            return Resolution::Disposed;
        }
        if token.generation != self.generation {
            return Resolution::Stale;
        }

        self.state = match result {
            Ok(data) => FetchState::Success(Rc::new(data)),
            Err(e) => FetchState::Failure(e.to_string()),
        };
        self.dataset = token.dataset();
        Resolution::Applied
    }

    /// Renders every outstanding request inert.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.generation += 1;
    }

    fn issue(&mut self) -> Option<FetchRequest> {
        self.generation += 1;
        let selection = self.selection.as_ref()?;

        if !selection.is_queryable_for(self.dimensions) {
            self.state = FetchState::Idle;
            return None;
        }

        self.state = FetchState::Loading;
        Some(FetchRequest {
            token: RequestToken {
                generation: self.generation,
            },
            selection: selection.clone(),
            params: shape(selection, self.dimensions),
        })
    }
}
