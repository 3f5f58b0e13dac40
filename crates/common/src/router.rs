// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::http::{RequestPayload, ResponsePayload};
use async_trait::async_trait;

#[async_trait]
pub trait Router: Sync {
    /// Route the request, returning `None` if this router doesn't handle it
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload>;
}
